//! Capabilities the session controller consumes.
//!
//! Implementations live outside this module: wallets in `missive-wallets`, the contract-backed
//! ledger in [`ledger`](crate::ledger), stores in [`store`](crate::store).

use crate::model::RawTransferRecord;
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

/// Authorizes accounts and signs and sends value transfers.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The error type raised by the wallet.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the authorized accounts, the preferred one first.
    ///
    /// A `silent` request only reports accounts that are already authorized, an interactive one
    /// may ask the user to authorize some.
    async fn request_accounts(&self, silent: bool) -> Result<Vec<Address>, Self::Error>;

    /// Signs and sends `amount` base units from `from` to `to`, returning the transaction hash.
    async fn send_value_transfer(
        &self,
        from: Address,
        to: Address,
        amount: U256,
        gas_limit: u64,
    ) -> Result<TxHash, Self::Error>;
}

/// A submitted ledger write that has not been confirmed yet.
#[async_trait]
pub trait PendingTransfer: Send {
    /// The error type raised while waiting.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Hash of the submitted transaction.
    fn tx_hash(&self) -> TxHash;

    /// Blocks until the write is confirmed.
    async fn wait(self) -> Result<TxHash, Self::Error>;
}

/// Reads and writes transfer records on the remote append-only ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// The error type raised by ledger calls.
    type Error: std::error::Error + Send + Sync + 'static;
    /// Handle returned by [`record_transfer`](Self::record_transfer).
    type Pending: PendingTransfer;

    /// Returns every recorded transfer, oldest first.
    async fn list_transfers(&self) -> Result<Vec<RawTransferRecord>, Self::Error>;

    /// Returns the number of recorded transfers.
    async fn transfer_count(&self) -> Result<u64, Self::Error>;

    /// Submits a record of a transfer to `to`.
    async fn record_transfer(
        &self,
        to: Address,
        amount: U256,
        message: String,
        keyword: String,
    ) -> Result<Self::Pending, Self::Error>;
}
