use crate::{init_tracing, mocks::*};
use alloy_primitives::U256;
use missive_session::{
    FormField, INSTALL_WALLET_ALERT, KeyValueStore, MemoryStore, SessionController, SessionError,
    SessionEvent, TRANSACTION_COUNT_KEY, TransferForm,
};
use similar_asserts::assert_eq;
use std::sync::Arc;
use tokio::sync::broadcast;

type Controller = SessionController<MockWallet, MockLedger, Arc<MemoryStore>>;

fn controller(wallet: Option<MockWallet>, ledger: MockLedger) -> (Controller, Arc<MemoryStore>) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    (SessionController::new(wallet, ledger, store.clone()), store)
}

fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

fn loading_events(events: &[SessionEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::Loading(loading) => Some(*loading),
            _ => None,
        })
        .collect()
}

fn fill_form(controller: &Controller, amount: &str) {
    controller.update_form(FormField::AddressTo, BOB.to_string());
    controller.update_form(FormField::Amount, amount);
    controller.update_form(FormField::Keyword, "coffee");
    controller.update_form(FormField::Message, "thanks for the coffee");
}

#[tokio::test]
async fn connect_without_wallet_alerts() {
    let (controller, _) = controller(None, MockLedger::default());
    let mut rx = controller.subscribe();

    let account = controller.connect_wallet().await.unwrap();

    assert_eq!(account, None);
    assert_eq!(controller.session().current_account, None);
    assert_eq!(drain(&mut rx), vec![SessionEvent::Alert(INSTALL_WALLET_ALERT.to_string())]);
}

#[tokio::test]
async fn connect_sets_first_account() {
    let wallet = MockWallet::with_accounts([BOB, ALICE]);
    let (controller, _) = controller(Some(wallet.clone()), MockLedger::default());
    let mut rx = controller.subscribe();

    let account = controller.connect_wallet().await.unwrap();

    assert_eq!(account, Some(BOB));
    assert_eq!(controller.session().current_account, Some(BOB));
    assert_eq!(wallet.0.lock().requests, vec![false]);
    assert_eq!(drain(&mut rx), vec![SessionEvent::AccountChanged(BOB)]);
}

#[tokio::test]
async fn connect_with_no_authorized_account_keeps_session() {
    let (controller, _) = controller(Some(MockWallet::default()), MockLedger::default());

    assert_eq!(controller.connect_wallet().await.unwrap(), None);
    assert_eq!(controller.session().current_account, None);
}

#[tokio::test]
async fn connect_propagates_wallet_failure() {
    let wallet = MockWallet::with_accounts([ALICE]);
    wallet.0.lock().fail_requests = true;
    let (controller, _) = controller(Some(wallet), MockLedger::default());

    let err = controller.connect_wallet().await.unwrap_err();

    assert!(matches!(err, SessionError::ProviderRequest(_)), "{err}");
    assert_eq!(controller.session().current_account, None);
}

#[tokio::test]
async fn initialize_restores_account_with_no_transfers() {
    let wallet = MockWallet::with_accounts([ALICE]);
    let (controller, store) = controller(Some(wallet.clone()), MockLedger::default());

    controller.initialize().await.unwrap();

    let session = controller.session();
    assert_eq!(session.current_account, Some(ALICE));
    assert!(session.transactions.is_empty());
    assert!(!session.is_loading);
    assert_eq!(wallet.0.lock().requests, vec![true]);
    assert_eq!(store.get(TRANSACTION_COUNT_KEY).unwrap().as_deref(), Some("0"));
}

#[tokio::test]
async fn initialize_loads_existing_transfers() {
    let ledger = MockLedger::with_transfers(vec![
        raw_transfer(10_000_000_000_000, "first"),
        raw_transfer(2_500_000_000_000_000_000, "second"),
    ]);
    let (controller, store) = controller(Some(MockWallet::with_accounts([ALICE])), ledger);

    controller.initialize().await.unwrap();

    let transactions = controller.session().transactions;
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].amount.to_string(), "0.00001");
    assert_eq!(transactions[1].amount.to_string(), "2.5");
    assert_eq!(transactions[1].message, "second");
    assert_eq!(store.get(TRANSACTION_COUNT_KEY).unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn initialize_without_accounts_skips_refresh() {
    let ledger = MockLedger::with_transfers(vec![raw_transfer(1, "one")]);
    let (controller, store) = controller(Some(MockWallet::default()), ledger.clone());

    controller.initialize().await.unwrap();

    assert_eq!(controller.session().current_account, None);
    assert!(controller.session().transactions.is_empty());
    assert_eq!(ledger.0.lock().list_calls, 0);
    assert_eq!(store.get(TRANSACTION_COUNT_KEY).unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn initialize_without_wallet_alerts_and_still_counts() {
    let ledger = MockLedger::with_transfers(vec![raw_transfer(1, "one")]);
    let (controller, store) = controller(None, ledger);
    let mut rx = controller.subscribe();

    controller.initialize().await.unwrap();

    assert_eq!(drain(&mut rx), vec![SessionEvent::Alert(INSTALL_WALLET_ALERT.to_string())]);
    assert_eq!(store.get(TRANSACTION_COUNT_KEY).unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn initialize_reports_wallet_failure_after_counting() {
    let wallet = MockWallet::with_accounts([ALICE]);
    wallet.0.lock().fail_requests = true;
    let ledger = MockLedger::with_transfers(vec![raw_transfer(1, "one")]);
    let (controller, store) = controller(Some(wallet), ledger);

    let err = controller.initialize().await.unwrap_err();

    assert!(matches!(err, SessionError::ProviderRequest(_)), "{err}");
    assert_eq!(store.get(TRANSACTION_COUNT_KEY).unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn initialize_reports_count_failure() {
    let ledger = MockLedger::default();
    ledger.0.lock().fail_count = true;
    let (controller, store) = controller(Some(MockWallet::with_accounts([ALICE])), ledger);

    let err = controller.initialize().await.unwrap_err();

    assert!(matches!(err, SessionError::LedgerCall(_)), "{err}");
    assert_eq!(controller.session().current_account, Some(ALICE));
    assert_eq!(store.get(TRANSACTION_COUNT_KEY).unwrap(), None);
}

#[tokio::test]
async fn initialize_swallows_refresh_failure() {
    let ledger = MockLedger::default();
    ledger.0.lock().fail_list = true;
    let (controller, _) = controller(Some(MockWallet::with_accounts([ALICE])), ledger);

    controller.initialize().await.unwrap();
    assert_eq!(controller.session().current_account, Some(ALICE));
}

#[tokio::test]
async fn new_seeds_count_from_store() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    store.set(TRANSACTION_COUNT_KEY, "12").unwrap();
    let controller: Controller = SessionController::new(None, MockLedger::default(), store);
    assert_eq!(controller.session().transaction_count, Some(12));

    let store = Arc::new(MemoryStore::new());
    store.set(TRANSACTION_COUNT_KEY, "twelve").unwrap();
    let controller: Controller = SessionController::new(None, MockLedger::default(), store);
    assert_eq!(controller.session().transaction_count, None);
}

#[tokio::test]
async fn refresh_is_idempotent() {
    let ledger = MockLedger::with_transfers(vec![raw_transfer(1, "one"), raw_transfer(2, "two")]);
    let (controller, _) = controller(None, ledger);
    let mut rx = controller.subscribe();

    controller.refresh_transfers().await.unwrap();
    let first = controller.session();
    controller.refresh_transfers().await.unwrap();

    assert_eq!(controller.session(), first);
    assert_eq!(
        drain(&mut rx),
        vec![SessionEvent::TransfersReplaced(2), SessionEvent::TransfersReplaced(2)]
    );
}

#[tokio::test]
async fn refresh_failure_keeps_previous_transfers() {
    let ledger = MockLedger::with_transfers(vec![raw_transfer(1, "one")]);
    let (controller, _) = controller(None, ledger.clone());
    controller.refresh_transfers().await.unwrap();

    ledger.0.lock().fail_list = true;
    let err = controller.refresh_transfers().await.unwrap_err();

    assert!(matches!(err, SessionError::LedgerCall(_)), "{err}");
    assert_eq!(controller.session().transactions.len(), 1);
}

#[tokio::test]
async fn refresh_rejects_malformed_record() {
    let mut bad = raw_transfer(1, "bad");
    bad.timestamp = u64::MAX;
    let (controller, _) = controller(None, MockLedger::with_transfers(vec![bad]));

    let err = controller.refresh_transfers().await.unwrap_err();

    assert!(matches!(err, SessionError::MalformedRecord { timestamp: u64::MAX }), "{err}");
    assert!(controller.session().transactions.is_empty());
}

#[tokio::test]
async fn update_form_keeps_other_fields() {
    let (controller, _) = controller(None, MockLedger::default());
    fill_form(&controller, "0.1");

    controller.update_form(FormField::Keyword, "tea");

    let form = controller.form();
    assert_eq!(form.keyword, "tea");
    assert_eq!(form.address_to, BOB.to_string());
    assert_eq!(form.amount, "0.1");
    assert_eq!(form.message, "thanks for the coffee");
}

#[tokio::test]
async fn send_transfer_records_and_persists_count() {
    let wallet = MockWallet::with_accounts([ALICE]);
    let ledger = MockLedger::with_transfers(vec![raw_transfer(1, "earlier")]);
    let (controller, store) = controller(Some(wallet.clone()), ledger.clone());
    controller.connect_wallet().await.unwrap();
    fill_form(&controller, "0.00001");
    assert!(!controller.session().is_loading);
    let mut rx = controller.subscribe();

    let outcome = controller.send_transfer().await.unwrap();

    assert_eq!(outcome.value_tx, VALUE_TX);
    assert_eq!(outcome.record_tx, RECORD_TX);
    assert_eq!(outcome.transaction_count, 2);

    let sent = wallet.0.lock().sent.clone();
    assert_eq!(
        sent,
        vec![SentValue { from: ALICE, to: BOB, amount: U256::from(10_000_000_000_000u64), gas_limit: 21_000 }]
    );

    let session = controller.session();
    assert!(!session.is_loading);
    assert_eq!(session.transaction_count, Some(2));
    assert_eq!(store.get(TRANSACTION_COUNT_KEY).unwrap().as_deref(), Some("2"));
    assert_eq!(session.transactions.len(), 2);
    assert_eq!(session.transactions[1].keyword, "coffee");
    assert_eq!(session.transactions[1].message, "thanks for the coffee");
    assert_eq!(session.transactions[1].amount.to_string(), "0.00001");
    assert_eq!(controller.form(), TransferForm::default());

    assert_eq!(
        drain(&mut rx),
        vec![
            SessionEvent::Loading(true),
            SessionEvent::Loading(false),
            SessionEvent::TransactionCount(2),
            SessionEvent::FormCleared,
            SessionEvent::TransfersReplaced(2),
        ]
    );
}

#[tokio::test]
async fn send_transfer_tolerates_refresh_failure_after_confirmation() {
    let ledger = MockLedger::default();
    let (controller, store) = controller(Some(MockWallet::with_accounts([ALICE])), ledger.clone());
    controller.connect_wallet().await.unwrap();
    fill_form(&controller, "1");
    ledger.0.lock().fail_list = true;

    let outcome = controller.send_transfer().await.unwrap();

    assert_eq!(outcome.transaction_count, 1);
    assert_eq!(store.get(TRANSACTION_COUNT_KEY).unwrap().as_deref(), Some("1"));
    assert_eq!(controller.form(), TransferForm::default());
}

#[tokio::test]
async fn send_transfer_record_failure_never_loads() {
    let ledger = MockLedger::default();
    ledger.0.lock().fail_record = true;
    let (controller, store) = controller(Some(MockWallet::with_accounts([ALICE])), ledger);
    controller.connect_wallet().await.unwrap();
    fill_form(&controller, "0.00001");
    let mut rx = controller.subscribe();

    let err = controller.send_transfer().await.unwrap_err();

    assert!(matches!(err, SessionError::LedgerCall(_)), "{err}");
    assert!(!controller.session().is_loading);
    assert!(loading_events(&drain(&mut rx)).is_empty());
    assert_eq!(store.get(TRANSACTION_COUNT_KEY).unwrap(), None);
    assert_eq!(controller.form().amount, "0.00001");
}

#[tokio::test]
async fn send_transfer_resets_loading_when_wait_fails() {
    let ledger = MockLedger::default();
    ledger.0.lock().fail_wait = true;
    let (controller, _) = controller(Some(MockWallet::with_accounts([ALICE])), ledger);
    controller.connect_wallet().await.unwrap();
    fill_form(&controller, "0.5");
    let mut rx = controller.subscribe();

    let err = controller.send_transfer().await.unwrap_err();

    assert!(matches!(err, SessionError::LedgerCall(_)), "{err}");
    assert!(!controller.session().is_loading);
    assert_eq!(loading_events(&drain(&mut rx)), vec![true, false]);
}

#[tokio::test]
async fn send_transfer_without_wallet_alerts() {
    let (controller, _) = controller(None, MockLedger::default());
    fill_form(&controller, "0.1");
    let mut rx = controller.subscribe();

    let err = controller.send_transfer().await.unwrap_err();

    assert!(matches!(err, SessionError::MissingProvider), "{err}");
    assert_eq!(drain(&mut rx), vec![SessionEvent::Alert(INSTALL_WALLET_ALERT.to_string())]);
}

#[tokio::test]
async fn send_transfer_requires_connected_account() {
    let wallet = MockWallet::with_accounts([ALICE]);
    let (controller, _) = controller(Some(wallet.clone()), MockLedger::default());
    fill_form(&controller, "0.1");

    let err = controller.send_transfer().await.unwrap_err();

    assert!(matches!(err, SessionError::NotConnected), "{err}");
    assert!(wallet.0.lock().sent.is_empty());
}

#[tokio::test]
async fn send_transfer_validates_form() {
    let wallet = MockWallet::with_accounts([ALICE]);
    let (controller, _) = controller(Some(wallet.clone()), MockLedger::default());
    controller.connect_wallet().await.unwrap();

    fill_form(&controller, "0.1");
    controller.update_form(FormField::AddressTo, "not an address");
    let err = controller.send_transfer().await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidAddress { ref input, .. } if input == "not an address"));

    fill_form(&controller, "lots");
    let err = controller.send_transfer().await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidAmount { ref input, .. } if input == "lots"));

    assert!(wallet.0.lock().sent.is_empty());
}

#[tokio::test]
async fn send_transfer_rejects_negative_and_over_precise_amounts() {
    let wallet = MockWallet::with_accounts([ALICE]);
    let ledger = MockLedger::default();
    let (controller, _) = controller(Some(wallet.clone()), ledger.clone());
    controller.connect_wallet().await.unwrap();

    for amount in ["-1", "0.0000000000000000001"] {
        fill_form(&controller, amount);
        let err = controller.send_transfer().await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidAmount { ref input, .. } if input == amount), "{err}");
    }

    assert!(wallet.0.lock().sent.is_empty());
    assert!(ledger.0.lock().transfers.is_empty());
}

#[tokio::test]
async fn send_transfer_propagates_wallet_failure() {
    let wallet = MockWallet::with_accounts([ALICE]);
    let ledger = MockLedger::default();
    let (controller, _) = controller(Some(wallet.clone()), ledger.clone());
    controller.connect_wallet().await.unwrap();
    fill_form(&controller, "0.1");
    wallet.0.lock().fail_sends = true;

    let err = controller.send_transfer().await.unwrap_err();

    assert!(matches!(err, SessionError::ProviderRequest(_)), "{err}");
    assert!(ledger.0.lock().transfers.is_empty());
}
