use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::domain::{ProcessedReceipt, ReceiptId, ReceiptPayload, UserToken};
use super::duplicate::DuplicateDetector;
use super::error::IntakeError;
use super::repository::{ReceiptStore, StoreError, UserLedger};
use super::scoring::{ScoringConfig, ScoringEngine};
use super::validation::ReceiptValidator;

/// Fans a batch out to one scoring task per receipt and merges the results
/// into the injected store and ledger.
///
/// The promotion count is snapshotted once per batch before any task is
/// spawned, so every receipt of a batch sees the same prior count no matter
/// how the tasks interleave.
pub struct BatchDispatcher<S, L> {
    validator: ReceiptValidator,
    duplicates: DuplicateDetector,
    engine: Arc<ScoringEngine>,
    store: Arc<S>,
    ledger: Arc<L>,
}

impl<S, L> BatchDispatcher<S, L>
where
    S: ReceiptStore + 'static,
    L: UserLedger + 'static,
{
    pub fn new(store: Arc<S>, ledger: Arc<L>, config: ScoringConfig) -> Self {
        Self {
            validator: ReceiptValidator::new(),
            duplicates: DuplicateDetector,
            engine: Arc::new(ScoringEngine::new(config)),
            store,
            ledger,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Process a batch for `token`, returning the new ids in input order.
    ///
    /// Results are merged in completion order. Successes are committed as they
    /// arrive until the first failure; from then on every remaining result is
    /// discarded and that failure is returned once all tasks have finished.
    /// Receipts committed before the failure stay stored.
    pub async fn submit_batch(
        &self,
        token: UserToken,
        payloads: Vec<ReceiptPayload>,
    ) -> Result<Vec<ReceiptId>, IntakeError> {
        if payloads.is_empty() {
            return Ok(Vec::new());
        }

        let account = self.ledger.get_or_create(&token).map_err(|err| {
            error!(error = %err, "user ledger could not resolve submitting user");
            IntakeError::UserResolutionFailed(err.to_string())
        })?;
        let prior_receipts = account.receipt_count();
        let batch_size = payloads.len();

        let mut tasks = JoinSet::new();
        for (index, payload) in payloads.into_iter().enumerate() {
            let pipeline = ItemPipeline {
                validator: self.validator,
                duplicates: self.duplicates,
                engine: Arc::clone(&self.engine),
                store: Arc::clone(&self.store),
                owner: token.clone(),
                prior_receipts,
            };
            tasks.spawn(async move { (index, pipeline.process(payload)) });
        }

        let mut committed: Vec<(usize, ReceiptId)> = Vec::with_capacity(batch_size);
        let mut first_failure: Option<IntakeError> = None;
        let mut discarded = 0usize;

        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok((index, result)) => result.map(|receipt| (index, receipt)),
                Err(err) => Err(IntakeError::Internal(err.to_string())),
            };

            if first_failure.is_some() {
                discarded += 1;
                continue;
            }

            match outcome.and_then(|(index, receipt)| Ok((index, self.commit(receipt)?))) {
                Ok(entry) => committed.push(entry),
                Err(err) => first_failure = Some(err),
            }
        }

        if let Some(err) = first_failure {
            warn!(
                batch_size,
                committed = committed.len(),
                discarded,
                error = %err,
                "receipt batch rejected"
            );
            return Err(err);
        }

        committed.sort_by_key(|(index, _)| *index);
        info!(batch_size, prior_receipts, "receipt batch processed");
        Ok(committed.into_iter().map(|(_, id)| id).collect())
    }

    /// Store the receipt, then append it to its owner's ledger entry.
    fn commit(&self, receipt: ProcessedReceipt) -> Result<ReceiptId, IntakeError> {
        let id = receipt.id.clone();
        let owner = receipt.user.clone();
        let points = receipt.points;

        self.store.put(receipt).map_err(|err| match err {
            StoreError::DuplicateKey(existing) => {
                debug!(%existing, "duplicate receipt rejected at commit");
                IntakeError::DuplicateReceipt
            }
            StoreError::Conflict => {
                error!(%id, "generated receipt id collided with a stored receipt");
                IntakeError::InternalMergeInconsistency(format!("receipt id {id} already stored"))
            }
            other => IntakeError::Store(other),
        })?;

        match self.ledger.append(&owner, id.clone()) {
            Ok(owned) => {
                debug!(%id, points, owned, "receipt committed");
                Ok(id)
            }
            Err(StoreError::NotFound) => {
                error!(%id, "stored receipt has no ledger entry for its owner");
                Err(IntakeError::UserResolutionFailed(format!(
                    "no ledger entry for the owner of receipt {id}"
                )))
            }
            Err(err) => {
                error!(%id, error = %err, "ledger append failed after receipt was stored");
                Err(IntakeError::InternalMergeInconsistency(err.to_string()))
            }
        }
    }

    pub fn lookup(&self, id: &ReceiptId) -> Result<ProcessedReceipt, IntakeError> {
        self.store
            .get(id)
            .map_err(IntakeError::Store)?
            .ok_or_else(|| IntakeError::ReceiptNotFound(id.clone()))
    }

    pub fn lookup_points(&self, id: &ReceiptId) -> Result<u64, IntakeError> {
        self.lookup(id).map(|receipt| receipt.points)
    }
}

/// Everything one scoring task needs, detached from the dispatcher's borrow.
struct ItemPipeline<S> {
    validator: ReceiptValidator,
    duplicates: DuplicateDetector,
    engine: Arc<ScoringEngine>,
    store: Arc<S>,
    owner: UserToken,
    prior_receipts: usize,
}

impl<S> ItemPipeline<S>
where
    S: ReceiptStore,
{
    fn process(self, payload: ReceiptPayload) -> Result<ProcessedReceipt, IntakeError> {
        let validated = self.validator.validate(payload)?;
        self.duplicates
            .ensure_unique(self.store.as_ref(), &validated.payload().business_key())?;
        let breakdown = self.engine.score(&validated, self.prior_receipts)?;

        Ok(ProcessedReceipt {
            id: ReceiptId::generate(),
            receipt: validated.into_payload(),
            points: breakdown.total,
            components: breakdown.components,
            user: self.owner,
            submitted_at: Utc::now(),
        })
    }
}
