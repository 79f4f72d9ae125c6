use super::Client;
use comfy_table::{Cell, CellAlignment, Table, presets::ASCII_MARKDOWN};
use eyre::Result;
use missive_session::TransferRecord;

/// `missive transfers`
pub async fn run(client: &Client, json: bool) -> Result<()> {
    client.controller.refresh_transfers().await?;
    let transfers = client.controller.session().transactions;

    if json {
        println!("{}", serde_json::to_string_pretty(&transfers)?);
    } else if transfers.is_empty() {
        println!("No transfers recorded yet.");
    } else {
        println!("{}", transfers_table(&transfers));
    }
    Ok(())
}

/// Renders transfers newest first.
fn transfers_table(transfers: &[TransferRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);
    table.set_header(["Time (UTC)", "From", "To", "Amount (ETH)", "Keyword", "Message"]);
    for transfer in transfers.iter().rev() {
        table.add_row([
            Cell::new(transfer.timestamp.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(transfer.address_from),
            Cell::new(transfer.address_to),
            Cell::new(transfer.amount).set_alignment(CellAlignment::Right),
            Cell::new(&transfer.keyword),
            Cell::new(&transfer.message),
        ]);
    }
    table
}
