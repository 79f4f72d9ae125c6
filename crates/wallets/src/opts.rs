use alloy_primitives::Address;
use clap::Parser;
use serde::Serialize;

/// Command line options selecting the wallet.
///
/// Serializes to the matching config keys so they can be merged over the config file; unset
/// options are skipped and leave the file's values in place.
#[derive(Clone, Debug, Default, Serialize, Parser)]
#[command(next_help_heading = "Wallet options", about = None, long_about = None)]
pub struct WalletOpts {
    /// Use the provided private key.
    #[arg(long, value_name = "RAW_PRIVATE_KEY")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    /// Send through accounts managed by the node, using `eth_sendTransaction`.
    #[arg(long, conflicts_with = "private_key")]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unlocked: bool,

    /// The sender account.
    ///
    /// With `--unlocked` it picks the node account to use. With a private key it must match the
    /// key's address.
    #[arg(long, short, value_name = "ADDRESS", env = "ETH_FROM")]
    #[serde(rename = "sender", skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
}
