use alloy_primitives::Address;
use clap::{Parser, Subcommand, ValueHint};
use eyre::Result;
use missive_config::{
    Config,
    figment::{
        self, Metadata, Profile,
        value::{Dict, Map, Value},
    },
};
use missive_wallets::WalletOpts;
use serde::Serialize;
use std::path::PathBuf;

/// Send ether with a message attached and read back the transfers recorded on chain.
#[derive(Parser)]
#[command(name = "missive", version, next_display_order = None)]
pub struct Missive {
    #[command(flatten)]
    pub opts: GlobalOpts,

    #[command(subcommand)]
    pub cmd: MissiveSubcommand,
}

#[derive(Subcommand)]
pub enum MissiveSubcommand {
    /// Show the connected account and the last known transfer count.
    #[command(visible_alias = "st")]
    Status,

    /// Ask the wallet to authorize an account.
    #[command(visible_alias = "c")]
    Connect,

    /// List the transfers recorded on the ledger.
    #[command(visible_aliases = &["ls", "list"])]
    Transfers {
        /// Print the transfers as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Print the number of transfers recorded on the ledger.
    Count,

    /// Send ether and record the transfer on the ledger.
    #[command(visible_alias = "s")]
    Send(SendArgs),

    /// Print the resolved configuration.
    Config,
}

/// Arguments for `missive send`.
#[derive(Clone, Debug, Parser)]
pub struct SendArgs {
    /// The recipient address.
    #[arg(value_name = "TO")]
    pub address_to: String,

    /// The amount to send, in ether.
    #[arg(value_name = "AMOUNT")]
    pub amount: String,

    /// A keyword describing the transfer.
    #[arg(long, short, default_value = "")]
    pub keyword: String,

    /// A message to record with the transfer.
    #[arg(long, short, default_value = "")]
    pub message: String,
}

/// Options shared by every subcommand, merged over the config file and environment.
#[derive(Clone, Debug, Default, Serialize, Parser)]
#[command(next_help_heading = "Connection options")]
pub struct GlobalOpts {
    /// The RPC endpoint.
    #[arg(long, short, env = "ETH_RPC_URL", value_name = "URL")]
    #[serde(rename = "eth_rpc_url", skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Address of the ledger contract.
    #[arg(long, value_name = "ADDRESS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<Address>,

    /// Number of confirmations to wait for after recording a transfer.
    #[arg(long, value_name = "N")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u64>,

    /// Seconds to wait for a recorded transfer to confirm.
    #[arg(long, value_name = "SECONDS")]
    #[serde(rename = "transaction_timeout", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Path of the file the transfer count is persisted to.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<PathBuf>,

    #[command(flatten)]
    #[serde(flatten)]
    pub wallet: WalletOpts,
}

impl GlobalOpts {
    /// Loads the config with these options merged on top.
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::from_provider(Config::figment().merge(self))?)
    }
}

impl figment::Provider for GlobalOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("command line arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let dict = Value::serialize(self)?
            .into_dict()
            .ok_or_else(|| figment::Error::from("command line arguments are not a map".to_string()))?;
        Ok(Map::from([(Config::selected_profile(), dict)]))
    }
}
