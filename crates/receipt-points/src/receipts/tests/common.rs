use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::receipts::domain::{Receipt, ReceiptId};
use crate::receipts::store::{InMemoryReceiptStore, ReceiptStore, StoreError};
use crate::receipts::{receipt_router, ReceiptPointsService};

/// Scores 28: retailer 6, pairs 10, two qualifying descriptions 3 + 3, odd day 6.
pub(super) fn target_receipt() -> Value {
    json!({
        "retailer": "Target",
        "purchaseDate": "2022-01-01",
        "purchaseTime": "13:01",
        "items": [
            { "shortDescription": "Mountain Dew 12PK", "price": "6.49" },
            { "shortDescription": "Emils Cheese Pizza", "price": "12.25" },
            { "shortDescription": "Knorr Creamy Chicken", "price": "1.26" },
            { "shortDescription": "Doritos Nacho Cheese", "price": "3.35" },
            { "shortDescription": "   Klarbrunn 12-PK 12 FL OZ  ", "price": "12.00" }
        ],
        "total": "35.35"
    })
}

/// Scores 109: retailer 14, round dollar 50, quarter 25, pairs 10, afternoon 10.
pub(super) fn corner_market_receipt() -> Value {
    json!({
        "retailer": "M&M Corner Market",
        "purchaseDate": "2022-03-20",
        "purchaseTime": "14:33",
        "items": [
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" }
        ],
        "total": "9.00"
    })
}

/// Single-item receipt scoring nothing except what the overrides introduce.
pub(super) fn quiet_receipt() -> Value {
    json!({
        "retailer": "-",
        "purchaseDate": "2022-01-02",
        "purchaseTime": "09:15",
        "items": [
            { "shortDescription": "Milk", "price": "3.10" }
        ],
        "total": "3.10"
    })
}

pub(super) fn with_field(mut receipt: Value, key: &str, value: Value) -> Value {
    receipt
        .as_object_mut()
        .expect("receipt fixture is an object")
        .insert(key.to_string(), value);
    receipt
}

pub(super) fn without_field(mut receipt: Value, key: &str) -> Value {
    receipt
        .as_object_mut()
        .expect("receipt fixture is an object")
        .remove(key);
    receipt
}

pub(super) fn receipt(value: Value) -> Receipt {
    Receipt::from_json(&value).expect("fixture passes validation")
}

pub(super) fn build_service() -> (
    ReceiptPointsService<InMemoryReceiptStore>,
    Arc<InMemoryReceiptStore>,
) {
    let store = Arc::new(InMemoryReceiptStore::new());
    (ReceiptPointsService::new(store.clone()), store)
}

pub(super) fn router_with_memory_store() -> axum::Router {
    let (service, _) = build_service();
    receipt_router(Arc::new(service))
}

pub(super) struct UnavailableStore;

impl ReceiptStore for UnavailableStore {
    fn create(&self, _points: u64) -> Result<ReceiptId, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn lookup(&self, _id: &ReceiptId) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
