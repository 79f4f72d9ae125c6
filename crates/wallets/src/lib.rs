//! # missive-wallets
//!
//! Wallets the session can send value transfers through.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod error;
pub use error::WalletError;

pub mod opts;
pub use opts::WalletOpts;

pub mod utils;
pub use utils::{create_private_key_signer, wallet_from_config};

use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use missive_common::{ProviderBuilder, RpcProvider};
use missive_session::WalletProvider;

/// How a [`Wallet`] signs.
#[derive(Clone, Debug)]
pub enum WalletSigner {
    /// A private key held in memory. Transactions are signed locally.
    Local(PrivateKeySigner),
    /// Accounts managed by the node, signed remotely through `eth_sendTransaction`.
    Unlocked {
        /// The node account to prefer.
        from: Option<Address>,
    },
}

/// A wallet bound to an RPC endpoint.
#[derive(Clone)]
pub struct Wallet {
    signer: WalletSigner,
    provider: RpcProvider,
    chain_id: Option<u64>,
}

impl Wallet {
    /// Connects `signer` to the node at `rpc_url`.
    pub fn new(signer: WalletSigner, rpc_url: &str) -> eyre::Result<Self> {
        let mut builder = ProviderBuilder::new(rpc_url);
        if let WalletSigner::Local(local) = &signer {
            builder = builder.wallet(EthereumWallet::from(local.clone()));
        }
        Ok(Self { signer, provider: builder.build()?, chain_id: None })
    }

    /// Pins the chain id of sent transactions instead of asking the node.
    pub fn with_chain_id(mut self, chain_id: Option<u64>) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Returns the provider transactions go through, with the local signer attached if any.
    pub fn provider(&self) -> &RpcProvider {
        &self.provider
    }

    /// The account writes are sent from, when it is known without asking the node.
    pub fn sender(&self) -> Option<Address> {
        match &self.signer {
            WalletSigner::Local(local) => Some(local.address()),
            WalletSigner::Unlocked { from } => *from,
        }
    }
}

#[async_trait]
impl WalletProvider for Wallet {
    type Error = WalletError;

    async fn request_accounts(&self, silent: bool) -> Result<Vec<Address>, Self::Error> {
        let from = match &self.signer {
            WalletSigner::Local(local) => return Ok(vec![local.address()]),
            WalletSigner::Unlocked { from } => *from,
        };

        let accounts = if silent {
            self.provider.get_accounts().await?
        } else {
            self.provider.client().request_noparams::<Vec<Address>>("eth_requestAccounts").await?
        };
        debug!(target: "missive::wallets", silent, count = accounts.len(), "node accounts");
        prefer_sender(accounts, from)
    }

    async fn send_value_transfer(
        &self,
        from: Address,
        to: Address,
        amount: U256,
        gas_limit: u64,
    ) -> Result<TxHash, Self::Error> {
        if let WalletSigner::Local(local) = &self.signer
            && local.address() != from
        {
            return Err(WalletError::SenderMismatch { from, signer: local.address() });
        }

        let mut tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_value(amount)
            .with_gas_limit(gas_limit);
        if let Some(chain_id) = self.chain_id {
            tx.set_chain_id(chain_id);
        }
        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        debug!(target: "missive::wallets", %tx_hash, %from, %to, %amount, "sent value transfer");
        Ok(tx_hash)
    }
}

/// Moves `from` to the front of `accounts`.
///
/// An empty list passes through untouched, any other list must contain `from`.
fn prefer_sender(mut accounts: Vec<Address>, from: Option<Address>) -> Result<Vec<Address>, WalletError> {
    let Some(from) = from else { return Ok(accounts) };
    if accounts.is_empty() {
        return Ok(accounts);
    }
    let Some(pos) = accounts.iter().position(|account| *account == from) else {
        return Err(WalletError::SenderNotManaged(from));
    };
    accounts[..=pos].rotate_right(1);
    Ok(accounts)
}
