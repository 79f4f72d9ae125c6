use super::Client;
use crate::args::SendArgs;
use eyre::Result;
use missive_session::FormField;

/// `missive send`: fills the form, connects if needed and sends.
pub async fn run(client: &Client, args: SendArgs) -> Result<()> {
    let controller = &client.controller;
    if controller.has_wallet() && controller.session().current_account.is_none() {
        controller.connect_wallet().await?;
    }

    let SendArgs { address_to, amount, keyword, message } = args;
    controller.update_form(FormField::AddressTo, address_to);
    controller.update_form(FormField::Amount, amount);
    controller.update_form(FormField::Keyword, keyword);
    controller.update_form(FormField::Message, message);

    let outcome = controller.send_transfer().await?;
    println!("value transfer: {}", outcome.value_tx);
    println!("ledger record:  {}", outcome.record_tx);
    println!("transfer count: {}", outcome.transaction_count);
    Ok(())
}
