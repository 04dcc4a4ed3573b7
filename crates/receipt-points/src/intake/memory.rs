use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::domain::{BusinessKey, ProcessedReceipt, ReceiptId, UserAccount, UserToken};
use super::repository::{ReceiptStore, StoreError, UserLedger};

/// Process-local receipt store.
///
/// Lock order is always `keys` then `receipts`, so a commit never deadlocks
/// against a concurrent lookup.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReceiptStore {
    receipts: Arc<DashMap<ReceiptId, ProcessedReceipt>>,
    keys: Arc<DashMap<BusinessKey, ReceiptId>>,
}

impl ReceiptStore for InMemoryReceiptStore {
    fn put(&self, receipt: ProcessedReceipt) -> Result<(), StoreError> {
        match self.keys.entry(receipt.business_key()) {
            Entry::Occupied(existing) => Err(StoreError::DuplicateKey(existing.get().clone())),
            Entry::Vacant(slot) => match self.receipts.entry(receipt.id.clone()) {
                Entry::Occupied(_) => Err(StoreError::Conflict),
                Entry::Vacant(record) => {
                    let id = receipt.id.clone();
                    record.insert(receipt);
                    slot.insert(id);
                    Ok(())
                }
            },
        }
    }

    fn get(&self, id: &ReceiptId) -> Result<Option<ProcessedReceipt>, StoreError> {
        Ok(self.receipts.get(id).map(|record| record.value().clone()))
    }

    fn find_by_business_key(&self, key: &BusinessKey) -> Result<Option<ReceiptId>, StoreError> {
        Ok(self.keys.get(key).map(|id| id.value().clone()))
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.receipts.len())
    }
}

/// Process-local user ledger keyed by token.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserLedger {
    accounts: Arc<DashMap<UserToken, UserAccount>>,
}

impl UserLedger for InMemoryUserLedger {
    fn get_or_create(&self, token: &UserToken) -> Result<UserAccount, StoreError> {
        let account = self
            .accounts
            .entry(token.clone())
            .or_insert_with(|| UserAccount::new(token.clone()));
        Ok(account.value().clone())
    }

    fn append(&self, token: &UserToken, id: ReceiptId) -> Result<usize, StoreError> {
        let mut account = self.accounts.get_mut(token).ok_or(StoreError::NotFound)?;
        account.receipts.push(id);
        Ok(account.receipts.len())
    }

    fn fetch(&self, token: &UserToken) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.accounts.get(token).map(|account| account.value().clone()))
    }
}
