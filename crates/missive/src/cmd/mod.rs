//! Subcommand implementations.

pub mod config;
pub mod send;
pub mod status;
pub mod transfers;

use crate::utils::{sh_status, sh_warn};
use eyre::{Result, eyre};
use missive_common::{RpcProvider, get_http_provider};
use missive_config::Config;
use missive_session::{
    ContractLedger, FileStore, KeyValueStore, SessionController, SessionEvent,
    TRANSACTION_COUNT_KEY, WalletProvider,
};
use missive_wallets::{Wallet, wallet_from_config};
use std::sync::Arc;
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};

pub type Controller = SessionController<Wallet, ContractLedger, Arc<FileStore>>;

/// A session wired to the configured wallet, ledger and store, initialized the way a fresh page
/// load would be.
pub struct Client {
    pub controller: Controller,
    pub store: Arc<FileStore>,
    pub provider: RpcProvider,
    pub config: Config,
    events: JoinHandle<()>,
}

impl Client {
    /// Builds the session for `config` and runs its initial wallet and count checks.
    ///
    /// Failed checks are reported as warnings; the session stays usable.
    pub async fn open(config: Config) -> Result<Self> {
        let contract = config.contract.ok_or_else(|| {
            eyre!("no ledger contract configured; set `contract` in missive.toml, MISSIVE_CONTRACT or --contract")
        })?;

        let wallet = wallet_from_config(&config)?;
        let provider = match &wallet {
            Some(wallet) => wallet.provider().clone(),
            None => get_http_provider(config.rpc_url())?,
        };

        let sender = match &wallet {
            Some(wallet) => match wallet.sender() {
                Some(sender) => Some(sender),
                None => match wallet.request_accounts(true).await {
                    Ok(accounts) => accounts.first().copied(),
                    Err(err) => {
                        debug!(%err, "could not resolve the ledger sender");
                        None
                    }
                },
            },
            None => None,
        };

        let ledger = ContractLedger::new(contract, provider.clone())
            .with_sender(sender)
            .with_confirmations(config.confirmations)
            .with_timeout(config.transaction_timeout());
        let store = Arc::new(FileStore::new(config.storage_path()));
        trace!(store = %store.path().display(), %contract, "opening session");

        let controller = SessionController::new(wallet, ledger, store.clone());
        let events = tokio::spawn(report_events(controller.subscribe()));
        if let Err(err) = controller.initialize().await {
            sh_warn(err);
        }

        Ok(Self { controller, store, provider, config, events })
    }

    /// Returns the transfer count persisted by the last successful count check.
    pub fn stored_count(&self) -> Result<Option<u64>> {
        let Some(value) = self.store.get(TRANSACTION_COUNT_KEY)? else { return Ok(None) };
        Ok(Some(value.trim().parse()?))
    }

    /// Drops the session and waits until every pending event has been reported.
    pub async fn close(self) {
        let Self { controller, events, .. } = self;
        drop(controller);
        join_reporter(events).await;
    }
}

/// Waits for the event reporter, returning false if it panicked or was cancelled.
async fn join_reporter(events: JoinHandle<()>) -> bool {
    match events.await {
        Ok(()) => true,
        Err(err) => {
            debug!(%err, "session event reporter stopped abnormally");
            false
        }
    }
}

async fn report_events(mut rx: broadcast::Receiver<SessionEvent>) {
    loop {
        match rx.recv().await {
            Ok(SessionEvent::Alert(message)) => sh_warn(message),
            Ok(SessionEvent::Loading(true)) => sh_status("waiting for the transfer record to confirm"),
            Ok(event) => trace!(?event, "session event"),
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "missed session events"),
            Err(RecvError::Closed) => break,
        }
    }
}

/// `missive connect`
pub async fn connect(client: &Client) -> Result<()> {
    match client.controller.connect_wallet().await? {
        Some(account) => println!("{account}"),
        None if client.controller.has_wallet() => sh_warn("the wallet authorized no account"),
        None => {}
    }
    Ok(())
}

/// `missive count`
pub fn count(client: &Client) -> Result<()> {
    let count = client.stored_count()?.ok_or_else(|| eyre!("the transfer count is unavailable"))?;
    println!("{count}");
    Ok(())
}
