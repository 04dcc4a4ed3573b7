use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::ScoreComponent;

/// Identifier wrapper for processed receipts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReceiptId(pub String);

impl ReceiptId {
    /// Mint a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque caller identity taken from the `X-Authorization` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserToken(pub String);

impl UserToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inbound receipt exactly as submitted.
///
/// Absent fields decode to empty values so that the validator, not the JSON
/// decoder, reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptPayload {
    pub retailer: String,
    pub purchase_date: String,
    pub purchase_time: String,
    pub items: Vec<Item>,
    pub total: String,
}

impl ReceiptPayload {
    pub fn business_key(&self) -> BusinessKey {
        BusinessKey {
            retailer: self.retailer.clone(),
            total: self.total.clone(),
            purchase_date: self.purchase_date.clone(),
            purchase_time: self.purchase_time.clone(),
        }
    }
}

/// Single purchased line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub short_description: String,
    pub price: String,
}

/// Receipt that passed validation, carrying its parsed purchase moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedReceipt {
    pub(crate) payload: ReceiptPayload,
    pub(crate) purchase_date: NaiveDate,
    pub(crate) purchase_time: NaiveTime,
}

impl ValidatedReceipt {
    pub fn payload(&self) -> &ReceiptPayload {
        &self.payload
    }

    pub fn purchase_date(&self) -> NaiveDate {
        self.purchase_date
    }

    pub fn purchase_time(&self) -> NaiveTime {
        self.purchase_time
    }

    pub fn into_payload(self) -> ReceiptPayload {
        self.payload
    }
}

/// Fields that identify a purchase regardless of its line items.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusinessKey {
    pub retailer: String,
    pub total: String,
    pub purchase_date: String,
    pub purchase_time: String,
}

/// Stored outcome of a successful submission. Never mutated once committed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedReceipt {
    pub id: ReceiptId,
    pub receipt: ReceiptPayload,
    pub points: u64,
    pub components: Vec<ScoreComponent>,
    pub user: UserToken,
    pub submitted_at: DateTime<Utc>,
}

impl ProcessedReceipt {
    pub fn business_key(&self) -> BusinessKey {
        self.receipt.business_key()
    }
}

/// Ledger entry for a submitting caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserAccount {
    pub token: UserToken,
    pub receipts: Vec<ReceiptId>,
}

impl UserAccount {
    pub fn new(token: UserToken) -> Self {
        Self {
            token,
            receipts: Vec::new(),
        }
    }

    pub fn receipt_count(&self) -> usize {
        self.receipts.len()
    }
}

/// Body of a successful submission, one entry per stored receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: ReceiptId,
}

/// Body of a points lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: u64,
}
