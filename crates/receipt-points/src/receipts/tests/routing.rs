use super::common::*;
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::receipts::router::{points_handler, process_handler};
use crate::receipts::store::InMemoryReceiptStore;
use crate::receipts::ReceiptPointsService;

fn post_receipt(body: impl Into<Body>) -> Request<Body> {
    Request::post("/receipts/process")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request builds")
}

fn get_points(id: &str) -> Request<Body> {
    Request::get(format!("/receipts/{id}/points"))
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn process_then_fetch_points_round_trip() {
    let router = router_with_memory_store();

    let response = router
        .clone()
        .oneshot(post_receipt(
            serde_json::to_vec(&corner_market_receipt()).expect("serialize fixture"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let id = payload
        .get("id")
        .and_then(serde_json::Value::as_str)
        .expect("id returned")
        .to_string();

    let response = router
        .oneshot(get_points(&id))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!({ "points": 109 }));
}

#[tokio::test]
async fn invalid_receipt_returns_bad_request_body() {
    let router = router_with_memory_store();
    let payload = without_field(target_receipt(), "retailer");

    let response = router
        .oneshot(post_receipt(serde_json::to_vec(&payload).expect("serialize")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body.get("error"), Some(&json!(400)));
    assert!(body
        .get("description")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .contains("'retailer' is a required property"));
}

#[tokio::test]
async fn malformed_json_returns_bad_request_body() {
    let router = router_with_memory_store();

    let response = router
        .oneshot(post_receipt("{ not json"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body.get("error"), Some(&json!(400)));
}

#[tokio::test]
async fn unknown_id_returns_not_found_body() {
    let router = router_with_memory_store();

    let response = router
        .oneshot(get_points("3f9c1b2e-0000-4000-8000-000000000000"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": 404, "description": "No receipt found for that ID." })
    );
}

#[tokio::test]
async fn process_handler_returns_internal_error_on_store_failure() {
    let service = Arc::new(ReceiptPointsService::new(Arc::new(UnavailableStore)));
    let body = Bytes::from(serde_json::to_vec(&target_receipt()).expect("serialize"));

    let response = process_handler::<UnavailableStore>(State(service), body).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("error"), Some(&json!(500)));
}

#[tokio::test]
async fn points_handler_reads_from_shared_store() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let processed = service.process(&target_receipt()).expect("processes");

    let response = points_handler::<InMemoryReceiptStore>(
        State(service.clone()),
        Path(processed.id.to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!({ "points": 28 }));
}

#[tokio::test]
async fn wrong_method_is_not_routed() {
    let router = router_with_memory_store();

    let response = router
        .oneshot(
            Request::get("/receipts/process")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
