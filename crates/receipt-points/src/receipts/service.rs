use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::domain::{Receipt, ReceiptId};
use super::points::{self, PointsBreakdown};
use super::schema::ValidationError;
use super::store::{ReceiptStore, StoreError};

/// Result of a successful `process` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedReceipt {
    pub id: ReceiptId,
    pub breakdown: PointsBreakdown,
}

/// Service composing the schema validator, the point rules, and the store.
pub struct ReceiptPointsService<S> {
    store: Arc<S>,
}

impl<S> ReceiptPointsService<S>
where
    S: ReceiptStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate and score a raw receipt payload, then record the total.
    pub fn process(&self, payload: &Value) -> Result<ProcessedReceipt, ReceiptServiceError> {
        let receipt = Receipt::from_json(payload)?;
        let breakdown = points::score(&receipt);
        let id = self.store.create(breakdown.total)?;

        debug!(receipt_id = %id, awards = ?breakdown.awards, "receipt scored");

        Ok(ProcessedReceipt { id, breakdown })
    }

    /// Points previously recorded for `id`.
    pub fn points(&self, id: &ReceiptId) -> Result<u64, ReceiptServiceError> {
        Ok(self.store.lookup(id)?)
    }
}

/// Error raised by the receipt service.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
