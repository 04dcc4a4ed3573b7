use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::domain::ReceiptId;
use super::repository::StoreError;

/// Constraint a receipt broke during validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("{field} is required")]
    Missing { field: String },
    #[error("{field} contains characters outside the allowed set")]
    Charset { field: String },
    #[error("{field} must be a decimal with exactly two fraction digits")]
    Amount { field: String },
    #[error("purchaseDate must be shaped YYYY-MM-DD")]
    DateFormat,
    #[error("purchaseTime must be shaped HH:MM")]
    TimeFormat,
    #[error("items must contain at least one entry")]
    NoItems,
}

impl ValidationFailure {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    pub(crate) fn charset(field: impl Into<String>) -> Self {
        Self::Charset {
            field: field.into(),
        }
    }

    pub(crate) fn amount(field: impl Into<String>) -> Self {
        Self::Amount {
            field: field.into(),
        }
    }
}

/// Failure surfaced by the intake pipeline.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("invalid JSON format: {0}")]
    MalformedInput(String),
    #[error("validation issue: {0}")]
    ValidationFailed(#[from] ValidationFailure),
    #[error("{field} couldn't be parsed as a decimal")]
    NumericParseFailed { field: String },
    #[error("error in parsing purchase datetime: {0}")]
    DateTimeParseFailed(String),
    #[error("this receipt has been uploaded before")]
    DuplicateReceipt,
    #[error("user could not be resolved: {0}")]
    UserResolutionFailed(String),
    #[error("no receipt found with the ID: {0}")]
    ReceiptNotFound(ReceiptId),
    #[error("receipt state could not be merged: {0}")]
    InternalMergeInconsistency(String),
    #[error(transparent)]
    Store(StoreError),
    #[error("intake task failed: {0}")]
    Internal(String),
}

impl IntakeError {
    /// HTTP status reported to callers for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeError::MalformedInput(_)
            | IntakeError::ValidationFailed(_)
            | IntakeError::NumericParseFailed { .. }
            | IntakeError::DateTimeParseFailed(_) => StatusCode::BAD_REQUEST,
            IntakeError::ReceiptNotFound(_) => StatusCode::NOT_FOUND,
            IntakeError::DuplicateReceipt => StatusCode::CONFLICT,
            IntakeError::UserResolutionFailed(_) => StatusCode::UNAUTHORIZED,
            IntakeError::InternalMergeInconsistency(_) => StatusCode::SERVICE_UNAVAILABLE,
            IntakeError::Store(_) | IntakeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for faults that stem from caller input rather than service state.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
