use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::schema::{self, ValidationError};

/// Opaque key handed back after a receipt is processed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(pub String);

impl ReceiptId {
    /// Fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-negative monetary amount with exactly two fractional digits.
///
/// Keeps the exact decimal alongside its integer cent count; the schema caps amounts so
/// the cent count always fits in a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount {
    value: Decimal,
    cents: u64,
}

impl Amount {
    /// Only the schema validator builds amounts, after checking shape and range.
    pub(crate) fn from_validated(value: Decimal, cents: u64) -> Self {
        Self { value, cents }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_whole_dollar(&self) -> bool {
        self.cents % 100 == 0
    }

    /// Exact number of cents, e.g. `12.34` -> `1234`.
    pub fn cents(&self) -> u64 {
        self.cents
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value)
    }
}

/// Receipt payload as it arrives on the wire, before conversion into a [`Receipt`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReceiptSubmission {
    pub retailer: String,
    pub purchase_date: String,
    pub purchase_time: String,
    pub total: String,
    pub items: Vec<ItemSubmission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemSubmission {
    pub short_description: String,
    pub price: String,
}

/// A single purchased line on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptItem {
    short_description: String,
    price: Amount,
}

impl ReceiptItem {
    pub(crate) fn new(short_description: String, price: Amount) -> Self {
        Self {
            short_description,
            price,
        }
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    pub fn price(&self) -> Amount {
        self.price
    }
}

/// Validated purchase record. Built once from checked input and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    retailer: String,
    purchase_date: NaiveDate,
    purchase_time: NaiveTime,
    total: Amount,
    items: Vec<ReceiptItem>,
}

impl Receipt {
    pub(crate) fn new(
        retailer: String,
        purchase_date: NaiveDate,
        purchase_time: NaiveTime,
        total: Amount,
        items: Vec<ReceiptItem>,
    ) -> Self {
        Self {
            retailer,
            purchase_date,
            purchase_time,
            total,
            items,
        }
    }

    /// Checks `value` against the receipt contract and builds the record in the same pass.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        schema::parse(value)
    }

    pub fn retailer(&self) -> &str {
        &self.retailer
    }

    pub fn purchase_date(&self) -> NaiveDate {
        self.purchase_date
    }

    pub fn purchase_time(&self) -> NaiveTime {
        self.purchase_time
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    /// Never empty.
    pub fn items(&self) -> &[ReceiptItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_hyphenated_uuids() {
        let id = ReceiptId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_eq!(id.as_str().len(), 36);
    }

    #[test]
    fn generated_ids_do_not_repeat() {
        let ids: HashSet<ReceiptId> = (0..1000).map(|_| ReceiptId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn amount_reports_whole_dollars_and_cents() {
        let whole = Amount::from_validated(dec!(12.00), 1200);
        let partial = Amount::from_validated(dec!(10.30), 1030);

        assert!(whole.is_whole_dollar());
        assert!(!partial.is_whole_dollar());
        assert_eq!(partial.cents(), 1030);
        assert_eq!(partial.value(), dec!(10.30));
        assert_eq!(partial.to_string(), "10.30");
    }
}
