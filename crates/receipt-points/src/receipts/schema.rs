//! Structural contract every incoming receipt must satisfy.
//!
//! The contract is a JSON Schema compiled once with `jsonschema`. A payload that passes
//! is deserialized into a [`ReceiptSubmission`] and converted into a [`Receipt`]; the
//! conversion catches what the schema cannot express (calendar dates, clock ranges, and
//! amounts too large to score exactly). Only one violation is reported per payload, with
//! the JSON path of the offending value.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use jsonschema::error::ValidationErrorKind;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{Amount, ItemSubmission, Receipt, ReceiptItem, ReceiptSubmission};

pub const RETAILER_PATTERN: &str = r"^[\w\s\-&]+$";
pub const DESCRIPTION_PATTERN: &str = r"^[\w\s\-]+$";
pub const AMOUNT_PATTERN: &str = r"^[0-9]+\.[0-9]{2}$";
pub const TIME_PATTERN: &str = r"^[0-9]{2}:[0-9]{2}$";

const DATE_FORMAT: &str = "date (YYYY-MM-DD)";
const TIME_FORMAT: &str = "24-hour time (HH:MM)";

const AMOUNT_SCALE: u32 = 2;
/// Largest accepted amount, in cents (1,000,000,000,000.00).
pub const MAX_AMOUNT_CENTS: u64 = 100_000_000_000_000;

/// Why a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("request body is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("{path}: expected {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{path}: '{property}' is a required property")]
    MissingProperty { path: String, property: String },
    #[error("{path}: additional properties are not allowed ('{property}' was unexpected)")]
    UnexpectedProperty { path: String, property: String },
    #[error("{path}: '{value}' does not match '{pattern}'")]
    PatternMismatch {
        path: String,
        value: String,
        pattern: &'static str,
    },
    #[error("{path}: '{value}' is not a valid {format}")]
    InvalidFormat {
        path: String,
        value: String,
        format: &'static str,
    },
    #[error("{path}: must contain at least one item")]
    EmptyItems { path: String },
    #[error("{path}: '{value}' exceeds the largest accepted amount")]
    AmountOutOfRange { path: String, value: String },
    #[error("{path}: {message}")]
    SchemaViolation { path: String, message: String },
}

impl ValidationError {
    /// JSON path of the offending value, when the body was parseable at all.
    pub fn path(&self) -> Option<&str> {
        match self {
            ValidationError::MalformedJson(_) => None,
            ValidationError::WrongType { path, .. }
            | ValidationError::MissingProperty { path, .. }
            | ValidationError::UnexpectedProperty { path, .. }
            | ValidationError::PatternMismatch { path, .. }
            | ValidationError::InvalidFormat { path, .. }
            | ValidationError::EmptyItems { path }
            | ValidationError::AmountOutOfRange { path, .. }
            | ValidationError::SchemaViolation { path, .. } => Some(path.as_str()),
        }
    }
}

/// Pass/fail check against the receipt contract.
pub fn validate(value: &Value) -> Result<(), ValidationError> {
    parse(value).map(|_| ())
}

/// Decodes a raw request body before validation.
pub fn parse_body(body: &[u8]) -> Result<Value, ValidationError> {
    serde_json::from_slice(body).map_err(|err| ValidationError::MalformedJson(err.to_string()))
}

pub(crate) fn parse(value: &Value) -> Result<Receipt, ValidationError> {
    check_schema(value)?;

    let submission = ReceiptSubmission::deserialize(value).map_err(|err| {
        ValidationError::SchemaViolation {
            path: "$".to_string(),
            message: err.to_string(),
        }
    })?;
    build_receipt(submission)
}

/// The receipt contract as a JSON Schema document.
pub fn receipt_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": {
            "retailer": {
                "description": "Name of the retailer or store the receipt is from.",
                "type": "string",
                "pattern": RETAILER_PATTERN
            },
            "purchaseDate": {
                "description": "Date of the purchase printed on the receipt.",
                "type": "string",
                "format": "date"
            },
            "purchaseTime": {
                "description": "Time of the purchase printed on the receipt, 24-hour clock.",
                "type": "string",
                "pattern": TIME_PATTERN
            },
            "total": {
                "description": "Total amount paid on the receipt.",
                "type": "string",
                "pattern": AMOUNT_PATTERN
            },
            "items": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "properties": {
                        "shortDescription": {
                            "description": "Short product description for the item.",
                            "type": "string",
                            "pattern": DESCRIPTION_PATTERN
                        },
                        "price": {
                            "description": "Total price paid for this item.",
                            "type": "string",
                            "pattern": AMOUNT_PATTERN
                        }
                    },
                    "required": ["shortDescription", "price"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["retailer", "purchaseDate", "purchaseTime", "total", "items"],
        "additionalProperties": false
    })
}

fn receipt_validator() -> &'static jsonschema::Validator {
    static VALIDATOR: OnceLock<jsonschema::Validator> = OnceLock::new();
    VALIDATOR.get_or_init(|| {
        jsonschema::options()
            .should_validate_formats(true)
            .build(&receipt_schema())
            .expect("receipt schema compiles")
    })
}

/// Runs the schema and reports the most fundamental violation it found.
///
/// Shape problems outrank value problems: a wrong type beats a missing key, which beats
/// an unexpected key, then an empty item list, then bad formats and patterns.
fn check_schema(value: &Value) -> Result<(), ValidationError> {
    let worst = receipt_validator()
        .iter_errors(value)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let path = json_path(value, &pointer);
            let instance = value.pointer(&pointer).unwrap_or(&Value::Null);

            match &error.kind {
                ValidationErrorKind::Type { .. } => (
                    0,
                    ValidationError::WrongType {
                        expected: expected_type(&path),
                        found: json_type(instance),
                        path,
                    },
                ),
                ValidationErrorKind::Required { property } => (
                    1,
                    ValidationError::MissingProperty {
                        path,
                        property: property
                            .as_str()
                            .map_or_else(|| property.to_string(), str::to_string),
                    },
                ),
                ValidationErrorKind::AdditionalProperties { unexpected } => (
                    2,
                    ValidationError::UnexpectedProperty {
                        path,
                        property: unexpected
                            .first()
                            .cloned()
                            .unwrap_or_else(|| "unknown".to_string()),
                    },
                ),
                ValidationErrorKind::MinItems { .. } => (3, ValidationError::EmptyItems { path }),
                ValidationErrorKind::Format { .. } => (
                    4,
                    ValidationError::InvalidFormat {
                        value: string_value(instance),
                        format: DATE_FORMAT,
                        path,
                    },
                ),
                ValidationErrorKind::Pattern { .. } => (
                    5,
                    ValidationError::PatternMismatch {
                        value: string_value(instance),
                        pattern: pattern_for(&path),
                        path,
                    },
                ),
                _ => (
                    6,
                    ValidationError::SchemaViolation {
                        path,
                        message: error.to_string(),
                    },
                ),
            }
        })
        .min_by_key(|(rank, _)| *rank);

    match worst {
        Some((_, error)) => Err(error),
        None => Ok(()),
    }
}

fn build_receipt(submission: ReceiptSubmission) -> Result<Receipt, ValidationError> {
    let purchase_date = NaiveDate::parse_from_str(&submission.purchase_date, "%Y-%m-%d")
        .map_err(|_| invalid_format(&submission.purchase_date, "$.purchaseDate", DATE_FORMAT))?;
    let purchase_time = NaiveTime::parse_from_str(&submission.purchase_time, "%H:%M")
        .map_err(|_| invalid_format(&submission.purchase_time, "$.purchaseTime", TIME_FORMAT))?;
    let total = amount(&submission.total, "$.total")?;

    let items = submission
        .items
        .into_iter()
        .enumerate()
        .map(|(index, item)| build_item(item, index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Receipt::new(
        submission.retailer,
        purchase_date,
        purchase_time,
        total,
        items,
    ))
}

fn build_item(item: ItemSubmission, index: usize) -> Result<ReceiptItem, ValidationError> {
    let price = amount(&item.price, &format!("$.items[{index}].price"))?;
    Ok(ReceiptItem::new(item.short_description, price))
}

/// Exact two-place amount no larger than [`MAX_AMOUNT_CENTS`].
fn amount(raw: &str, path: &str) -> Result<Amount, ValidationError> {
    // Decimal silently drops fractional digits once the integer part fills its precision,
    // so the scale is checked before the mantissa is read as cents.
    Decimal::from_str(raw)
        .ok()
        .filter(|value| value.scale() == AMOUNT_SCALE)
        .and_then(|value| {
            u64::try_from(value.mantissa())
                .ok()
                .filter(|cents| *cents <= MAX_AMOUNT_CENTS)
                .map(|cents| Amount::from_validated(value, cents))
        })
        .ok_or_else(|| ValidationError::AmountOutOfRange {
            path: path.to_string(),
            value: raw.to_string(),
        })
}

/// Turns a JSON pointer (`/items/0/price`) into the `$.items[0].price` notation used in
/// error messages, using the payload to tell array indices from keys.
fn json_path(root: &Value, pointer: &str) -> String {
    let mut path = String::from("$");
    let mut node = Some(root);

    for raw in pointer.split('/').skip(1) {
        let segment = raw.replace("~1", "/").replace("~0", "~");
        match node {
            Some(Value::Array(elements)) => {
                path.push_str(&format!("[{segment}]"));
                node = segment.parse::<usize>().ok().and_then(|i| elements.get(i));
            }
            Some(Value::Object(fields)) => {
                path.push('.');
                path.push_str(&segment);
                node = fields.get(&segment);
            }
            _ => {
                path.push('.');
                path.push_str(&segment);
                node = None;
            }
        }
    }

    path
}

/// Type the schema declares at `path`.
fn expected_type(path: &str) -> &'static str {
    if path == "$" {
        "object"
    } else if path == "$.items" {
        "array"
    } else if path.starts_with("$.items[") && path.ends_with(']') {
        "object"
    } else {
        "string"
    }
}

fn pattern_for(path: &str) -> &'static str {
    if path == "$.retailer" {
        RETAILER_PATTERN
    } else if path == "$.purchaseTime" {
        TIME_PATTERN
    } else if path.ends_with(".shortDescription") {
        DESCRIPTION_PATTERN
    } else {
        AMOUNT_PATTERN
    }
}

fn invalid_format(raw: &str, path: &str, format: &'static str) -> ValidationError {
    ValidationError::InvalidFormat {
        path: path.to_string(),
        value: raw.to_string(),
        format,
    }
}

fn string_value(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_string)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
