use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, warn};

use super::dispatcher::BatchDispatcher;
use super::domain::{IdResponse, PointsResponse, ReceiptId, ReceiptPayload, UserToken};
use super::error::IntakeError;
use super::repository::{ReceiptStore, UserLedger};

pub const AUTHORIZATION_HEADER: &str = "x-authorization";

/// Router builder exposing receipt intake and points lookup.
pub fn receipt_router<S, L>(dispatcher: Arc<BatchDispatcher<S, L>>) -> Router
where
    S: ReceiptStore + 'static,
    L: UserLedger + 'static,
{
    Router::new()
        .route("/receipts/process", post(process_handler::<S, L>))
        .route("/receipts/:id/points", get(points_handler::<S, L>))
        .with_state(dispatcher)
}

/// Accepted request bodies: a batch, or a lone receipt treated as a batch of one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SubmissionBody {
    Batch(Vec<ReceiptPayload>),
    Single(ReceiptPayload),
}

impl SubmissionBody {
    pub(crate) fn parse(body: &[u8]) -> Result<Vec<ReceiptPayload>, IntakeError> {
        match serde_json::from_slice::<SubmissionBody>(body) {
            Ok(SubmissionBody::Batch(receipts)) => Ok(receipts),
            Ok(SubmissionBody::Single(receipt)) => Ok(vec![receipt]),
            Err(err) => Err(IntakeError::MalformedInput(err.to_string())),
        }
    }
}

pub(crate) fn token_from_headers(headers: &HeaderMap) -> UserToken {
    let raw = headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    UserToken(raw.to_string())
}

pub(crate) async fn process_handler<S, L>(
    State(dispatcher): State<Arc<BatchDispatcher<S, L>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    S: ReceiptStore + 'static,
    L: UserLedger + 'static,
{
    let token = token_from_headers(&headers);
    let outcome = match SubmissionBody::parse(&body) {
        Ok(receipts) => dispatcher.submit_batch(token, receipts).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(ids) => {
            let payload: Vec<IdResponse> = ids.into_iter().map(|id| IdResponse { id }).collect();
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn points_handler<S, L>(
    State(dispatcher): State<Arc<BatchDispatcher<S, L>>>,
    Path(id): Path<String>,
) -> Response
where
    S: ReceiptStore + 'static,
    L: UserLedger + 'static,
{
    match dispatcher.lookup_points(&ReceiptId(id)) {
        Ok(points) => (StatusCode::OK, Json(PointsResponse { points })).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: IntakeError) -> Response {
    if err.is_client_error() {
        debug!(error = %err, "request rejected");
    } else {
        warn!(error = %err, "request failed");
    }
    err.into_response()
}
