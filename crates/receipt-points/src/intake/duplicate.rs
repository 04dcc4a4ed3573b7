use tracing::debug;

use super::domain::BusinessKey;
use super::error::IntakeError;
use super::repository::ReceiptStore;

/// Rejects receipts whose retailer, total, date and time match a stored one.
///
/// This is the read-only pre-check run by each scoring task. Two items of the
/// same batch can both pass it; `ReceiptStore::put` repeats the check
/// atomically when the winner is committed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateDetector;

impl DuplicateDetector {
    pub fn ensure_unique<S>(&self, store: &S, key: &BusinessKey) -> Result<(), IntakeError>
    where
        S: ReceiptStore + ?Sized,
    {
        match store.find_by_business_key(key).map_err(IntakeError::Store)? {
            Some(existing) => {
                debug!(%existing, retailer = %key.retailer, "duplicate receipt rejected");
                Err(IntakeError::DuplicateReceipt)
            }
            None => Ok(()),
        }
    }
}
