//! The `missive` command line client.

#[macro_use]
extern crate tracing;

use args::{Missive, MissiveSubcommand};
use clap::Parser;
use cmd::Client;
use eyre::Result;

mod args;
mod cmd;
mod handler;
mod utils;

fn main() -> Result<()> {
    handler::install();
    utils::subscriber();
    utils::enable_paint();
    let args = Missive::parse();
    run(args)
}

#[tokio::main]
async fn run(args: Missive) -> Result<()> {
    let config = args.opts.load_config()?;
    if let MissiveSubcommand::Config = args.cmd {
        return cmd::config::run(&config);
    }

    let client = Client::open(config).await?;
    let result = match args.cmd {
        MissiveSubcommand::Status => cmd::status::run(&client).await,
        MissiveSubcommand::Connect => cmd::connect(&client).await,
        MissiveSubcommand::Transfers { json } => cmd::transfers::run(&client, json).await,
        MissiveSubcommand::Count => cmd::count(&client),
        MissiveSubcommand::Send(send) => cmd::send::run(&client, send).await,
        MissiveSubcommand::Config => unreachable!("handled before opening the session"),
    };
    client.close().await;
    result
}
