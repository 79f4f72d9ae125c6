//! Session error types.

use alloy_primitives::hex::FromHexError;
use missive_common::AmountError;
use std::path::PathBuf;

/// A type-erased provider error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the [`SessionController`](crate::SessionController).
///
/// Every variant is logged by the controller before it is returned.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No wallet provider is installed.
    #[error("no wallet provider found, install or configure a wallet")]
    MissingProvider,
    /// The wallet rejected or failed a request.
    #[error("wallet request failed: {0}")]
    ProviderRequest(#[source] BoxError),
    /// A read or write against the ledger failed.
    #[error("ledger call failed: {0}")]
    LedgerCall(#[source] BoxError),
    /// A transfer was requested before any account was authorized.
    #[error("no wallet account is connected")]
    NotConnected,
    /// The form's recipient is not an address.
    #[error("invalid recipient address {input:?}: {source}")]
    InvalidAddress {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        source: FromHexError,
    },
    /// The form's amount is not a decimal ether amount.
    #[error("invalid amount {input:?}: {source}")]
    InvalidAmount {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        source: AmountError,
    },
    /// The ledger returned a record whose timestamp is not a calendar time.
    #[error("malformed transfer record: timestamp {timestamp} is out of range")]
    MalformedRecord {
        /// The raw unix timestamp.
        timestamp: u64,
    },
    /// The durable store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    pub(crate) fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ProviderRequest(Box::new(err))
    }

    pub(crate) fn ledger(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::LedgerCall(Box::new(err))
    }
}

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("failed to access store at {}: {source}", path.display())]
    Io {
        /// The store's path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The backing file is not a JSON object of strings.
    #[error("store at {} is corrupted: {source}", path.display())]
    Corrupted {
        /// The store's path.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
}
