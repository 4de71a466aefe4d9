use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::{error, info, warn};

use super::domain::ReceiptId;
use super::schema;
use super::service::{ReceiptPointsService, ReceiptServiceError};
use super::store::{ReceiptStore, StoreError, NOT_FOUND_DESCRIPTION};

/// Router builder exposing receipt processing and point lookup.
pub fn receipt_router<S>(service: Arc<ReceiptPointsService<S>>) -> Router
where
    S: ReceiptStore + 'static,
{
    Router::new()
        .route("/receipts/process", post(process_handler::<S>))
        .route("/receipts/:id/points", get(points_handler::<S>))
        .with_state(service)
}

// The body is taken raw so malformed JSON gets the same 400 payload as schema violations.
pub(crate) async fn process_handler<S>(
    State(service): State<Arc<ReceiptPointsService<S>>>,
    body: Bytes,
) -> Response
where
    S: ReceiptStore + 'static,
{
    info!("received receipt for processing");

    let outcome = schema::parse_body(&body)
        .map_err(ReceiptServiceError::from)
        .and_then(|payload| service.process(&payload));

    match outcome {
        Ok(processed) => {
            info!(
                receipt_id = %processed.id,
                points = processed.breakdown.total,
                "receipt processed"
            );
            let payload = json!({ "id": processed.id });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn points_handler<S>(
    State(service): State<Arc<ReceiptPointsService<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: ReceiptStore + 'static,
{
    info!(receipt_id = %id, "received points lookup");

    match service.points(&ReceiptId(id)) {
        Ok(points) => (StatusCode::OK, axum::Json(json!({ "points": points }))).into_response(),
        Err(err) => failure_response(err),
    }
}

fn failure_response(err: ReceiptServiceError) -> Response {
    match err {
        ReceiptServiceError::Validation(violation) => {
            warn!(%violation, "receipt rejected");
            error_body(StatusCode::BAD_REQUEST, violation.to_string())
        }
        ReceiptServiceError::Store(StoreError::NotFound(id)) => {
            warn!(receipt_id = %id, "no receipt stored under id");
            error_body(StatusCode::NOT_FOUND, NOT_FOUND_DESCRIPTION.to_string())
        }
        ReceiptServiceError::Store(other) => {
            error!(error = %other, "receipt store failure");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

fn error_body(status: StatusCode, description: String) -> Response {
    let payload = json!({
        "error": status.as_u16(),
        "description": description,
    });
    (status, axum::Json(payload)).into_response()
}
