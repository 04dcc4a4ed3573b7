//! Receipt intake: validation, duplicate detection, scoring and the batch
//! dispatcher that merges results into the receipt store and user ledger.

pub mod dispatcher;
pub mod domain;
pub mod duplicate;
pub mod error;
pub mod memory;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod validation;

#[cfg(test)]
mod tests;

pub use dispatcher::BatchDispatcher;
pub use domain::{
    BusinessKey, IdResponse, Item, PointsResponse, ProcessedReceipt, ReceiptId, ReceiptPayload,
    UserAccount, UserToken, ValidatedReceipt,
};
pub use duplicate::DuplicateDetector;
pub use error::{IntakeError, ValidationFailure};
pub use memory::{InMemoryReceiptStore, InMemoryUserLedger};
pub use repository::{ReceiptStore, StoreError, UserLedger};
pub use router::receipt_router;
pub use scoring::{PointsBreakdown, ScoreComponent, ScoringConfig, ScoringEngine, ScoringRule};
pub use validation::ReceiptValidator;
