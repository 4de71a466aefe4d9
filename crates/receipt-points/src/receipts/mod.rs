//! Receipt intake, scoring, and point lookup.

pub mod domain;
pub mod points;
pub mod router;
pub mod schema;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{Amount, ItemSubmission, Receipt, ReceiptId, ReceiptItem, ReceiptSubmission};
pub use points::{score, PointRule, PointsBreakdown, RuleAward};
pub use router::receipt_router;
pub use schema::{receipt_schema, validate, ValidationError};
pub use service::{ProcessedReceipt, ReceiptPointsService, ReceiptServiceError};
pub use store::{InMemoryReceiptStore, ReceiptStore, StoreError};
