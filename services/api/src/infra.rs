use metrics_exporter_prometheus::PrometheusHandle;
use receipt_points::config::IntakeConfig;
use receipt_points::intake::{
    BatchDispatcher, InMemoryReceiptStore, InMemoryUserLedger, ScoringConfig,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type ReceiptDispatcher = BatchDispatcher<InMemoryReceiptStore, InMemoryUserLedger>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn scoring_config(intake: &IntakeConfig) -> ScoringConfig {
    ScoringConfig::default().with_promotion_limit(intake.promotion_receipt_limit)
}

/// Fresh process-local store and ledger; state is lost on restart.
pub(crate) fn in_memory_dispatcher(intake: &IntakeConfig) -> Arc<ReceiptDispatcher> {
    Arc::new(BatchDispatcher::new(
        Arc::new(InMemoryReceiptStore::default()),
        Arc::new(InMemoryUserLedger::default()),
        scoring_config(intake),
    ))
}
