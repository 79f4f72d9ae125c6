//! # missive-session
//!
//! The wallet session: account authorization, the value transfer plus ledger record write path,
//! and the read-back of recorded transfers.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod controller;
mod error;
mod events;
pub mod ledger;
mod model;
mod ports;
pub mod store;

pub use controller::{INSTALL_WALLET_ALERT, SessionController};
pub use error::{BoxError, SessionError, StoreError};
pub use events::SessionEvent;
pub use ledger::ContractLedger;
pub use model::{FormField, RawTransferRecord, SendOutcome, Session, TransferForm, TransferRecord};
pub use ports::{LedgerClient, PendingTransfer, WalletProvider};
pub use store::{FileStore, KeyValueStore, MemoryStore, TRANSACTION_COUNT_KEY};
