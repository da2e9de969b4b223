//! Validation of raw exchange records.
//!
//! Records come from an external ledger and are not trusted. Each one is
//! checked on its own: a malformed record is set aside as a [`Rejection`] and
//! the rest of the batch carries on. Nothing here aborts a batch.

use crate::models::{CommodityStandard, Exchange, ExchangeData, Record, Value};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;
use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// Why a single record could not become an [`Exchange`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or null
    #[error("missing field \"{0}\"")]
    MissingField(&'static str),
    /// A field holds a value of the wrong kind
    #[error("field \"{field}\" should be {expected}")]
    WrongType {
        /// The offending field
        field: &'static str,
        /// What was expected instead
        expected: &'static str,
    },
    /// A decimal field does not hold a number
    #[error("field \"{field}\" is not a decimal: {value}")]
    InvalidDecimal {
        /// The offending field
        field: &'static str,
        /// The text that failed to parse
        value: String,
    },
    /// A timestamp field does not hold a recognisable instant
    #[error("field \"{field}\" is not a timestamp: {value}")]
    InvalidTimestamp {
        /// The offending field
        field: &'static str,
        /// The text that failed to parse
        value: String,
    },
    /// The commodity standard is not one we can account for
    #[error("unrecognized commodity standard \"{0}\"")]
    UnrecognizedStandard(String),
    /// The quantity is zero or negative
    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),
    /// The amount paid is negative
    #[error("amount paid cannot be negative, got {0}")]
    NegativeAmount(Decimal),
    /// The amount paid is beyond what a report can safely total
    #[error("amount paid {0} exceeds the per-exchange limit")]
    AmountTooLarge(Decimal),
    /// Source and destination are the same location
    #[error("exchange moves stock from {0} to itself")]
    SelfTransfer(String),
}

/// A record that failed validation.
///
/// Serialises with the error rendered as its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Position of the record in its batch
    pub index: usize,
    /// The record's `exchange_id`, if one could be read
    pub exchange_id: Option<String>,
    /// What was wrong with it
    #[serde(serialize_with = "as_message")]
    pub error: ValidationError,
}

fn as_message<S: Serializer>(error: &ValidationError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// The outcome of validating a batch: every record lands in exactly one list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated {
    /// Records that became exchanges, in batch order
    pub exchanges: Vec<Exchange>,
    /// Records that were set aside, in batch order
    pub rejections: Vec<Rejection>,
}

impl Validated {
    /// Number of rejected records
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }
}

/// Validates every record of a batch, skipping (and recording) bad ones.
pub fn validate_records(records: impl IntoIterator<Item = Record>) -> Validated {
    let mut validated = Validated::default();
    for (index, record) in records.into_iter().enumerate() {
        match parse_exchange(&record) {
            Ok(exchange) => validated.exchanges.push(exchange),
            Err(error) => validated.rejections.push(Rejection {
                index,
                exchange_id: record
                    .get("exchange_id")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                error,
            }),
        }
    }
    validated
}

/// Converts one raw record into an [`Exchange`].
pub fn parse_exchange(record: &Record) -> Result<Exchange, ValidationError> {
    let data = ExchangeData {
        exchange_id: text(record, "exchange_id")?,
        from_warehouse: text(record, "from_warehouse")?,
        to_warehouse: text(record, "to_warehouse")?,
        brand_manufacturer: text(record, "brand_manufacturer")?,
        item_type: text(record, "item_type")?,
        commodity_standard: CommodityStandard::from_str(&text(record, "commodity_standard")?)?,
        quantity: decimal(record, "quantity")?,
        unit: text(record, "unit")?,
        price_paid_usd: decimal(record, "price_paid_usd")?,
        timestamp: timestamp(record, "timestamp")?,
        batch_id: optional_text(record, "batch_id")?,
        item_ids: item_ids(record, "item_ids")?,
    };
    Exchange::new(data)
}

fn required<'a>(record: &'a Record, field: &'static str) -> Result<&'a Value, ValidationError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn text(record: &Record, field: &'static str) -> Result<String, ValidationError> {
    required(record, field)?
        .as_str()
        .map(str::to_owned)
        .ok_or(ValidationError::WrongType {
            field,
            expected: "text",
        })
}

fn optional_text(record: &Record, field: &'static str) -> Result<Option<String>, ValidationError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "text",
        }),
    }
}

// Numbers are read through their text form so that no binary rounding sneaks in.
fn decimal(record: &Record, field: &'static str) -> Result<Decimal, ValidationError> {
    let raw = match required(record, field)? {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => {
            return Err(ValidationError::WrongType {
                field,
                expected: "a decimal",
            });
        }
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| ValidationError::InvalidDecimal { field, value: raw })
}

fn timestamp(record: &Record, field: &'static str) -> Result<OffsetDateTime, ValidationError> {
    let raw = required(record, field)?
        .as_str()
        .ok_or(ValidationError::WrongType {
            field,
            expected: "a timestamp",
        })?
        .trim();
    parse_timestamp(raw).ok_or_else(|| ValidationError::InvalidTimestamp {
        field,
        value: raw.to_owned(),
    })
}

/// Parses RFC 3339, or a bare `YYYY-MM-DD HH:MM:SS[.fff]` taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(instant);
    }
    let naive = format_description!(
        "[year]-[month]-[day][first [T][ ]][hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    PrimitiveDateTime::parse(raw, naive)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

fn item_ids(record: &Record, field: &'static str) -> Result<Option<Vec<String>>, ValidationError> {
    let wrong_type = || ValidationError::WrongType {
        field,
        expected: "a list of text",
    };
    let list = match record.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items.clone(),
        // Stores without a list type keep the list as JSON text
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => return Ok(None),
            _ => return Err(wrong_type()),
        },
        Some(_) => return Err(wrong_type()),
    };
    list.into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            _ => Err(wrong_type()),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
