use crate::{
    FormField, KeyValueStore, LedgerClient, PendingTransfer, SendOutcome, Session, SessionError,
    SessionEvent, TRANSACTION_COUNT_KEY, TransferForm, TransferRecord, WalletProvider,
};
use alloy_primitives::Address;
use missive_common::{EtherAmount, VALUE_TRANSFER_GAS_LIMIT, errors::display_chain};
use parking_lot::Mutex;
use std::str::FromStr;
use tokio::sync::broadcast;

/// The prompt raised when an action needs a wallet and none is installed.
pub const INSTALL_WALLET_ALERT: &str = "Please install a wallet";

const EVENT_CAPACITY: usize = 64;

/// Owns the client-visible session and drives the wallet and the ledger.
///
/// Every method takes `&self`. State lives behind short-lived locks that are released before any
/// provider call is awaited, so actions may overlap; nothing prevents two concurrent sends.
pub struct SessionController<W, L, S> {
    wallet: Option<W>,
    ledger: L,
    store: S,
    state: Mutex<Session>,
    form: Mutex<TransferForm>,
    events: broadcast::Sender<SessionEvent>,
}

impl<W, L, S> SessionController<W, L, S>
where
    W: WalletProvider,
    L: LedgerClient,
    S: KeyValueStore,
{
    /// Creates a controller, seeding the transfer count from `store`.
    ///
    /// `wallet` is `None` when no wallet is installed; actions that need one raise
    /// [`SessionEvent::Alert`] instead.
    pub fn new(wallet: Option<W>, ledger: L, store: S) -> Self {
        let transaction_count = match store.get(TRANSACTION_COUNT_KEY) {
            Ok(Some(value)) => value
                .trim()
                .parse::<u64>()
                .inspect_err(|err| {
                    warn!(target: "missive::session", %value, %err, "ignoring stored transaction count");
                })
                .ok(),
            Ok(None) => None,
            Err(err) => {
                warn!(target: "missive::session", err = %display_chain(&err), "failed to read stored transaction count");
                None
            }
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            wallet,
            ledger,
            store,
            state: Mutex::new(Session { transaction_count, ..Default::default() }),
            form: Mutex::new(TransferForm::default()),
            events,
        }
    }

    /// Subscribes to session changes made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Returns a snapshot of the session.
    pub fn session(&self) -> Session {
        self.state.lock().clone()
    }

    /// Returns a snapshot of the form.
    pub fn form(&self) -> TransferForm {
        self.form.lock().clone()
    }

    /// Whether a wallet is installed.
    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    /// Restores an existing authorization and records the ledger's transfer count.
    ///
    /// Both checks always run. The first failure is returned.
    pub async fn initialize(&self) -> Result<(), SessionError> {
        let wallet = self.check_wallet_connected().await;
        let count = self.check_transaction_count().await;
        wallet.and(count)
    }

    async fn check_wallet_connected(&self) -> Result<(), SessionError> {
        let Some(wallet) = &self.wallet else {
            self.alert(INSTALL_WALLET_ALERT);
            return Ok(());
        };

        let accounts = wallet
            .request_accounts(true)
            .await
            .map_err(SessionError::provider)
            .inspect_err(|err| log_failure("check wallet", err))?;

        let Some(&account) = accounts.first() else {
            info!(target: "missive::session", "no accounts found");
            return Ok(());
        };
        self.set_account(account);

        if let Err(err) = self.refresh_transfers().await {
            debug!(target: "missive::session", err = %display_chain(&err), "initial refresh failed");
        }
        Ok(())
    }

    async fn check_transaction_count(&self) -> Result<(), SessionError> {
        let count = self
            .ledger
            .transfer_count()
            .await
            .map_err(SessionError::ledger)
            .inspect_err(|err| log_failure("read transaction count", err))?;
        trace!(target: "missive::session", count, "ledger transaction count");
        self.persist_count(count).inspect_err(|err| log_failure("store transaction count", err))
    }

    /// Asks the wallet to authorize an account and makes it current.
    ///
    /// Returns `Ok(None)` without touching the session when no wallet is installed or the wallet
    /// authorized no account.
    pub async fn connect_wallet(&self) -> Result<Option<Address>, SessionError> {
        let Some(wallet) = &self.wallet else {
            self.alert(INSTALL_WALLET_ALERT);
            return Ok(None);
        };

        let accounts = wallet
            .request_accounts(false)
            .await
            .map_err(SessionError::provider)
            .inspect_err(|err| log_failure("connect wallet", err))?;

        let account = accounts.first().copied();
        match account {
            Some(account) => self.set_account(account),
            None => info!(target: "missive::session", "wallet authorized no accounts"),
        }
        Ok(account)
    }

    /// Replaces the transfer list with the ledger's current records.
    ///
    /// On failure the previous list is kept.
    pub async fn refresh_transfers(&self) -> Result<(), SessionError> {
        let raw = self
            .ledger
            .list_transfers()
            .await
            .map_err(SessionError::ledger)
            .inspect_err(|err| log_failure("list transfers", err))?;

        let records = raw
            .into_iter()
            .map(TransferRecord::try_from)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| log_failure("list transfers", err))?;

        let len = records.len();
        self.state.lock().transactions = records;
        debug!(target: "missive::session", len, "replaced transfers");
        self.emit(SessionEvent::TransfersReplaced(len));
        Ok(())
    }

    /// Sets one form field, keeping the others.
    pub fn update_form(&self, field: FormField, value: impl Into<String>) {
        self.form.lock().set(field, value);
    }

    /// Empties every form field.
    pub fn clear_form(&self) {
        *self.form.lock() = TransferForm::default();
        self.emit(SessionEvent::FormCleared);
    }

    /// Sends the form's amount to its recipient, then records the transfer on the ledger.
    ///
    /// The session is loading while the record write waits for confirmation. Once confirmed, the
    /// transfer count is re-read and stored, the form is cleared and the transfer list refreshed.
    /// A failed refresh at that point is only logged.
    pub async fn send_transfer(&self) -> Result<SendOutcome, SessionError> {
        let result = self.try_send_transfer().await;
        result.inspect_err(|err| log_failure("send transfer", err))
    }

    async fn try_send_transfer(&self) -> Result<SendOutcome, SessionError> {
        let Some(wallet) = &self.wallet else {
            self.alert(INSTALL_WALLET_ALERT);
            return Err(SessionError::MissingProvider);
        };
        let from = self.state.lock().current_account.ok_or(SessionError::NotConnected)?;

        let TransferForm { address_to, amount, keyword, message } = self.form();
        let to = Address::from_str(address_to.trim())
            .map_err(|source| SessionError::InvalidAddress { input: address_to.clone(), source })?;
        let amount = amount
            .parse::<EtherAmount>()
            .map_err(|source| SessionError::InvalidAmount { input: amount.clone(), source })?
            .to_wei();

        let value_tx = wallet
            .send_value_transfer(from, to, amount, VALUE_TRANSFER_GAS_LIMIT)
            .await
            .map_err(SessionError::provider)?;
        debug!(target: "missive::session", %value_tx, %from, %to, %amount, "sent value transfer");

        let pending = self
            .ledger
            .record_transfer(to, amount, message, keyword)
            .await
            .map_err(SessionError::ledger)?;

        self.set_loading(true);
        info!(target: "missive::session", tx = %pending.tx_hash(), "loading");
        let confirmed = pending.wait().await;
        self.set_loading(false);
        let record_tx = confirmed.map_err(SessionError::ledger)?;
        info!(target: "missive::session", tx = %record_tx, "success");

        let transaction_count =
            self.ledger.transfer_count().await.map_err(SessionError::ledger)?;
        self.state.lock().transaction_count = Some(transaction_count);
        self.emit(SessionEvent::TransactionCount(transaction_count));
        self.persist_count(transaction_count)?;

        self.clear_form();
        if let Err(err) = self.refresh_transfers().await {
            warn!(target: "missive::session", err = %display_chain(&err), "transfer confirmed but refresh failed");
        }

        Ok(SendOutcome { value_tx, record_tx, transaction_count })
    }

    fn persist_count(&self, count: u64) -> Result<(), SessionError> {
        self.store.set(TRANSACTION_COUNT_KEY, &count.to_string())?;
        Ok(())
    }

    fn set_account(&self, account: Address) {
        self.state.lock().current_account = Some(account);
        debug!(target: "missive::session", %account, "account changed");
        self.emit(SessionEvent::AccountChanged(account));
    }

    fn set_loading(&self, loading: bool) {
        self.state.lock().is_loading = loading;
        self.emit(SessionEvent::Loading(loading));
    }

    fn alert(&self, message: &str) {
        warn!(target: "missive::session", "{message}");
        self.emit(SessionEvent::Alert(message.to_string()));
    }

    fn emit(&self, event: SessionEvent) {
        // no receivers is fine
        let _ = self.events.send(event);
    }
}

fn log_failure(action: &str, err: &SessionError) {
    error!(target: "missive::session", err = %display_chain(err), "{action} failed");
}
