use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::intake::domain::{
    BusinessKey, Item, ProcessedReceipt, ReceiptId, ReceiptPayload, UserAccount, UserToken,
    ValidatedReceipt,
};
use crate::intake::memory::{InMemoryReceiptStore, InMemoryUserLedger};
use crate::intake::repository::{ReceiptStore, StoreError, UserLedger};
use crate::intake::scoring::ScoringConfig;
use crate::intake::validation::ReceiptValidator;
use crate::intake::BatchDispatcher;

pub(super) type MemoryDispatcher = BatchDispatcher<InMemoryReceiptStore, InMemoryUserLedger>;

pub(super) fn item(short_description: &str, price: &str) -> Item {
    Item {
        short_description: short_description.to_string(),
        price: price.to_string(),
    }
}

pub(super) fn receipt(
    retailer: &str,
    purchase_date: &str,
    purchase_time: &str,
    total: &str,
    items: Vec<Item>,
) -> ReceiptPayload {
    ReceiptPayload {
        retailer: retailer.to_string(),
        purchase_date: purchase_date.to_string(),
        purchase_time: purchase_time.to_string(),
        items,
        total: total.to_string(),
    }
}

/// Two-item receipt worth 20 points before the promotion bonus.
pub(super) fn target_receipt() -> ReceiptPayload {
    receipt(
        "Target",
        "2022-01-01",
        "13:01",
        "35.35",
        vec![
            item("Mountain Dew 12PK", "6.49"),
            item("Emils Cheese Pizza", "12.25"),
        ],
    )
}

/// Five-item receipt worth 28 points before the promotion bonus.
pub(super) fn target_five_item_receipt() -> ReceiptPayload {
    receipt(
        "Target",
        "2022-01-01",
        "13:01",
        "35.35",
        vec![
            item("Mountain Dew 12PK", "6.49"),
            item("Emils Cheese Pizza", "12.25"),
            item("Knorr Creamy Chicken", "1.26"),
            item("Doritos Nacho Cheese", "3.35"),
            item("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
        ],
    )
}

/// Four identical items worth 109 points before the promotion bonus.
pub(super) fn corner_market_receipt() -> ReceiptPayload {
    receipt(
        "M&M Corner Market",
        "2022-03-20",
        "14:33",
        "9.00",
        vec![
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
        ],
    )
}

/// Valid receipt whose business key differs for every `seed`.
pub(super) fn distinct_receipt(seed: usize) -> ReceiptPayload {
    receipt(
        &format!("Store {seed}"),
        "2022-01-02",
        "10:00",
        &format!("{seed}.10"),
        vec![item("Bread", "1.10"), item("Milk", "2.00")],
    )
}

pub(super) fn validated(payload: ReceiptPayload) -> ValidatedReceipt {
    ReceiptValidator::new()
        .validate(payload)
        .expect("fixture receipt validates")
}

pub(super) fn token(raw: &str) -> UserToken {
    UserToken(raw.to_string())
}

pub(super) fn processed(payload: ReceiptPayload, owner: &str) -> ProcessedReceipt {
    ProcessedReceipt {
        id: ReceiptId::generate(),
        receipt: payload,
        points: 42,
        components: Vec::new(),
        user: token(owner),
        submitted_at: chrono::Utc::now(),
    }
}

pub(super) fn build_dispatcher() -> (
    Arc<MemoryDispatcher>,
    Arc<InMemoryReceiptStore>,
    Arc<InMemoryUserLedger>,
) {
    let store = Arc::new(InMemoryReceiptStore::default());
    let ledger = Arc::new(InMemoryUserLedger::default());
    let dispatcher = Arc::new(BatchDispatcher::new(
        store.clone(),
        ledger.clone(),
        ScoringConfig::default(),
    ));
    (dispatcher, store, ledger)
}

pub(super) fn owned_receipts(ledger: &InMemoryUserLedger, owner: &str) -> usize {
    ledger
        .fetch(&token(owner))
        .expect("ledger reachable")
        .map(|account| account.receipt_count())
        .unwrap_or_default()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableStore;

impl ReceiptStore for UnavailableStore {
    fn put(&self, _receipt: ProcessedReceipt) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn get(&self, _id: &ReceiptId) -> Result<Option<ProcessedReceipt>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn find_by_business_key(&self, _key: &BusinessKey) -> Result<Option<ReceiptId>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn len(&self) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

/// Ledger that resolves users but loses them (or fails) before the append.
pub(super) struct FaultyLedger {
    pub(super) append_error: StoreError,
}

impl UserLedger for FaultyLedger {
    fn get_or_create(&self, token: &UserToken) -> Result<UserAccount, StoreError> {
        Ok(UserAccount::new(token.clone()))
    }

    fn append(&self, _token: &UserToken, _id: ReceiptId) -> Result<usize, StoreError> {
        Err(self.append_error.clone())
    }

    fn fetch(&self, _token: &UserToken) -> Result<Option<UserAccount>, StoreError> {
        Ok(None)
    }
}

pub(super) struct UnreachableLedger;

impl UserLedger for UnreachableLedger {
    fn get_or_create(&self, _token: &UserToken) -> Result<UserAccount, StoreError> {
        Err(StoreError::Unavailable("ledger offline".to_string()))
    }

    fn append(&self, _token: &UserToken, _id: ReceiptId) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("ledger offline".to_string()))
    }

    fn fetch(&self, _token: &UserToken) -> Result<Option<UserAccount>, StoreError> {
        Err(StoreError::Unavailable("ledger offline".to_string()))
    }
}
