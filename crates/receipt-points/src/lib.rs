//! Receipt points service core.
//!
//! Incoming receipts are checked against a fixed JSON contract, scored by a set of
//! independent point rules, and their totals kept in an in-memory store keyed by a
//! generated identifier. The [`receipts::receipt_router`] exposes both operations over HTTP.

pub mod config;
pub mod error;
pub mod receipts;
pub mod telemetry;
