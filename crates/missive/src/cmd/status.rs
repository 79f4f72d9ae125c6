use super::Client;
use crate::utils::{or_unset, sh_warn};
use alloy_provider::Provider;
use comfy_table::{Table, presets::ASCII_MARKDOWN};
use eyre::Result;

/// `missive status`
pub async fn run(client: &Client) -> Result<()> {
    let session = client.controller.session();
    let config = &client.config;

    let node_chain_id = match client.provider.get_chain_id().await {
        Ok(id) => Some(id),
        Err(err) => {
            sh_warn(format_args!("could not query the chain id: {err}"));
            None
        }
    };
    if let (Some(expected), Some(actual)) = (config.chain_id, node_chain_id)
        && expected != actual
    {
        sh_warn(format_args!("configured chain id {expected} does not match the node's {actual}"));
    }

    let wallet = if config.private_key.is_some() {
        "local key"
    } else if config.unlocked {
        "node accounts"
    } else {
        "none"
    };

    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);
    table.set_header(["Field", "Value"]);
    table.add_row(["Account".to_string(), or_unset(session.current_account)]);
    table.add_row(["Wallet".to_string(), wallet.to_string()]);
    table.add_row(["Contract".to_string(), or_unset(config.contract)]);
    table.add_row(["RPC".to_string(), config.rpc_url().to_string()]);
    table.add_row(["Chain id".to_string(), or_unset(node_chain_id)]);
    table.add_row(["Transfer count".to_string(), or_unset(client.stored_count()?)]);
    table.add_row(["Transfers loaded".to_string(), session.transactions.len().to_string()]);
    println!("{table}");
    Ok(())
}
