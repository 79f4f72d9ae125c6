//! Common utilities shared by missive's crates.

#![warn(missing_docs)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod constants;
pub mod errors;
pub mod provider;
pub mod units;

pub use constants::*;
pub use provider::*;
pub use units::{AmountError, EtherAmount};
