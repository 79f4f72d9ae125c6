//! The transfer ledger contract, read and written over JSON-RPC.

use crate::{LedgerClient, PendingTransfer, RawTransferRecord};
use alloy_network::{Ethereum, ReceiptResponse};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{PendingTransactionBuilder, PendingTransactionError};
use alloy_sol_types::sol;
use async_trait::async_trait;
use missive_common::RpcProvider;
use std::time::Duration;

sol! {
    #[sol(rpc)]
    interface ITransactions {
        struct TransferStruct {
            address sender;
            address receiver;
            uint256 amount;
            string message;
            uint256 timestamp;
            string keyword;
        }

        function addToBlockchain(address receiver, uint256 amount, string memory message, string memory keyword) external;
        function getAllTransactions() external view returns (TransferStruct[] memory);
        function getTransactionCount() external view returns (uint256);
    }
}

/// Errors raised by [`ContractLedger`].
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Contract(#[from] alloy_contract::Error),
    #[error(transparent)]
    Pending(#[from] PendingTransactionError),
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    #[error("transaction count {0} does not fit in 64 bits")]
    CountOverflow(U256),
}

/// A [`LedgerClient`] backed by a deployed transactions contract.
#[derive(Clone)]
pub struct ContractLedger {
    contract: ITransactions::ITransactionsInstance<RpcProvider>,
    sender: Option<Address>,
    confirmations: u64,
    timeout: Option<Duration>,
}

impl ContractLedger {
    /// Binds the contract deployed at `address`.
    pub fn new(address: Address, provider: RpcProvider) -> Self {
        Self {
            contract: ITransactions::new(address, provider),
            sender: None,
            confirmations: 1,
            timeout: None,
        }
    }

    /// Sets the account writes are sent from.
    ///
    /// Needed when `provider` has no signer and writes go through `eth_sendTransaction`.
    pub fn with_sender(mut self, sender: Option<Address>) -> Self {
        self.sender = sender;
        self
    }

    /// Sets how many blocks a write must be buried under before it counts as confirmed.
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    /// Bounds the confirmation wait. Unbounded by default.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl LedgerClient for ContractLedger {
    type Error = LedgerError;
    type Pending = PendingRecord;

    async fn list_transfers(&self) -> Result<Vec<RawTransferRecord>, Self::Error> {
        let transfers = self.contract.getAllTransactions().call().await?;
        trace!(target: "missive::ledger", len = transfers.len(), "fetched transfers");
        Ok(transfers.into_iter().map(Into::into).collect())
    }

    async fn transfer_count(&self) -> Result<u64, Self::Error> {
        let count = self.contract.getTransactionCount().call().await?;
        u64::try_from(count).map_err(|_| LedgerError::CountOverflow(count))
    }

    async fn record_transfer(
        &self,
        to: Address,
        amount: U256,
        message: String,
        keyword: String,
    ) -> Result<Self::Pending, Self::Error> {
        let mut call = self.contract.addToBlockchain(to, amount, message, keyword);
        if let Some(sender) = self.sender {
            call = call.from(sender);
        }
        let pending = call.send().await?;
        debug!(target: "missive::ledger", tx = %pending.tx_hash(), %to, "submitted transfer record");
        Ok(PendingRecord { inner: pending, confirmations: self.confirmations, timeout: self.timeout })
    }
}

impl From<ITransactions::TransferStruct> for RawTransferRecord {
    fn from(transfer: ITransactions::TransferStruct) -> Self {
        Self {
            sender: transfer.sender,
            receiver: transfer.receiver,
            timestamp: transfer.timestamp.saturating_to(),
            amount: transfer.amount,
            message: transfer.message,
            keyword: transfer.keyword,
        }
    }
}

/// A submitted `addToBlockchain` call.
pub struct PendingRecord {
    inner: PendingTransactionBuilder<Ethereum>,
    confirmations: u64,
    timeout: Option<Duration>,
}

#[async_trait]
impl PendingTransfer for PendingRecord {
    type Error = LedgerError;

    fn tx_hash(&self) -> TxHash {
        *self.inner.tx_hash()
    }

    async fn wait(self) -> Result<TxHash, Self::Error> {
        let Self { inner, confirmations, timeout } = self;
        let receipt = inner
            .with_required_confirmations(confirmations)
            .with_timeout(timeout)
            .get_receipt()
            .await?;
        let tx_hash = receipt.transaction_hash();
        if !receipt.status() {
            return Err(LedgerError::Reverted(tx_hash));
        }
        trace!(target: "missive::ledger", %tx_hash, block = ?receipt.block_number(), "transfer record confirmed");
        Ok(tx_hash)
    }
}
