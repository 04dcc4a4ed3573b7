use super::domain::{BusinessKey, ProcessedReceipt, ReceiptId, UserAccount, UserToken};

/// Keyed storage for processed receipts so the dispatcher can be exercised in isolation.
pub trait ReceiptStore: Send + Sync {
    /// Store a receipt once. Rejects a reused id and a reused business key.
    fn put(&self, receipt: ProcessedReceipt) -> Result<(), StoreError>;
    fn get(&self, id: &ReceiptId) -> Result<Option<ProcessedReceipt>, StoreError>;
    /// Id of the stored receipt sharing `key`, if any.
    fn find_by_business_key(&self, key: &BusinessKey) -> Result<Option<ReceiptId>, StoreError>;
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

/// Per-user record of attributed receipts.
pub trait UserLedger: Send + Sync {
    fn get_or_create(&self, token: &UserToken) -> Result<UserAccount, StoreError>;
    /// Append `id` to the user's list in place, returning the new length.
    fn append(&self, token: &UserToken, id: ReceiptId) -> Result<usize, StoreError>;
    fn fetch(&self, token: &UserToken) -> Result<Option<UserAccount>, StoreError>;
}

/// Error enumeration for store and ledger failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("a receipt with the same retailer, total, date and time is stored as {0}")]
    DuplicateKey(ReceiptId),
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
