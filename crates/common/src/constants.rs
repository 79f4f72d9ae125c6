//! Commonly used constants.

use std::time::Duration;

/// The polling interval to use for local endpoints.
pub const LOCAL_HTTP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Number of decimals between one ether and its base unit.
pub const ETHER_DECIMALS: u8 = 18;

/// Gas consumed by a plain value transfer without calldata.
pub const VALUE_TRANSFER_GAS_LIMIT: u64 = 21_000;
