//! End-to-end scenarios for receipt intake driven through the public dispatcher
//! facade and HTTP router, without reaching into private modules.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use receipt_points::intake::{
    receipt_router, BatchDispatcher, InMemoryReceiptStore, InMemoryUserLedger, IntakeError, Item,
    ReceiptPayload, ReceiptStore, ScoringConfig, UserLedger, UserToken,
};

fn dispatcher() -> Arc<BatchDispatcher<InMemoryReceiptStore, InMemoryUserLedger>> {
    Arc::new(BatchDispatcher::new(
        Arc::new(InMemoryReceiptStore::default()),
        Arc::new(InMemoryUserLedger::default()),
        ScoringConfig::default(),
    ))
}

fn golden_receipt() -> ReceiptPayload {
    ReceiptPayload {
        retailer: "Target".to_string(),
        purchase_date: "2022-01-01".to_string(),
        purchase_time: "13:01".to_string(),
        items: vec![
            Item {
                short_description: "Mountain Dew 12PK".to_string(),
                price: "6.49".to_string(),
            },
            Item {
                short_description: "Emils Cheese Pizza".to_string(),
                price: "12.25".to_string(),
            },
        ],
        total: "35.35".to_string(),
    }
}

fn receipt_at(minute: u32) -> ReceiptPayload {
    ReceiptPayload {
        purchase_time: format!("09:{minute:02}"),
        ..golden_receipt()
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn golden_receipt_scores_320_for_a_new_user() {
    let dispatcher = dispatcher();
    let ids = dispatcher
        .submit_batch(UserToken("new-user".to_string()), vec![golden_receipt()])
        .await
        .expect("batch accepted");

    assert_eq!(dispatcher.lookup_points(&ids[0]).expect("known id"), 320);
}

#[tokio::test]
async fn fourth_sequential_receipt_loses_the_promotion() {
    let dispatcher = dispatcher();
    let user = UserToken("loyal".to_string());

    let mut points = Vec::new();
    for minute in 0..4 {
        let ids = dispatcher
            .submit_batch(user.clone(), vec![receipt_at(minute)])
            .await
            .expect("batch accepted");
        points.push(dispatcher.lookup_points(&ids[0]).expect("known id"));
    }

    assert_eq!(points, vec![320, 320, 320, 20]);
    let account = dispatcher
        .ledger()
        .fetch(&user)
        .expect("ledger reachable")
        .expect("user created");
    assert_eq!(account.receipts.len(), 4);
}

#[tokio::test]
async fn resubmission_is_a_conflict_and_stores_nothing_new() {
    let dispatcher = dispatcher();
    let user = UserToken("repeat".to_string());

    dispatcher
        .submit_batch(user.clone(), vec![golden_receipt()])
        .await
        .expect("first submission accepted");

    let mut altered = golden_receipt();
    altered.items.pop();
    let err = dispatcher
        .submit_batch(user, vec![altered])
        .await
        .expect_err("duplicate rejected");

    assert!(matches!(err, IntakeError::DuplicateReceipt));
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    assert_eq!(dispatcher.store().len().expect("store reachable"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn http_round_trip_from_submission_to_points() {
    let dispatcher = dispatcher();
    let router = receipt_router(dispatcher);

    let batch: Vec<ReceiptPayload> = (0..10).map(receipt_at).collect();
    let response = router
        .clone()
        .oneshot(
            Request::post("/receipts/process")
                .header("content-type", "application/json")
                .header("X-Authorization", "http-user")
                .body(Body::from(serde_json::to_vec(&batch).expect("serializable")))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let ids = body_json(response).await;
    let ids: Vec<String> = ids
        .as_array()
        .expect("array body")
        .iter()
        .map(|entry| entry["id"].as_str().expect("string id").to_string())
        .collect();
    assert_eq!(ids.len(), 10);

    for id in ids {
        let response = router
            .clone()
            .oneshot(
                Request::get(format!("/receipts/{id}/points"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "points": 320 }));
    }

    let response = router
        .oneshot(
            Request::get("/receipts/unknown/points")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
