//! Structured filters over a named collection.
//!
//! A filter map pairs keys with values. A key is either a bare field name
//! (equality) or `<field>__<op>` with `op` one of `gte`, `lte`, `gt`, `lt`,
//! `like` or `in`. All filters of a query are combined with AND; there is no
//! OR or NOT.
//!
//! Keys are resolved into [`FilterOp`]s once, when the [`Filters`] are built,
//! so a store only ever sees a closed set of operators.
//!
//! ```
//! use gains_core::filter::{FilterOp, Filters};
//! use serde_json::json;
//!
//! let filters = Filters::parse([
//!     ("item_type", json!("Wheat")),
//!     ("price_paid_usd__gte", json!(100000)),
//! ])
//! .unwrap();
//!
//! assert_eq!(filters.len(), 2);
//! assert_eq!(filters.iter().nth(1).unwrap().op(), FilterOp::Gte);
//! assert!(Filters::parse([("item_type__regex", json!("W.*"))]).is_err());
//! ```

use crate::models::Value;
use std::fmt;
use thiserror::Error;

/// The comparison applied by a single filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// `field = value`
    Eq,
    /// `field >= value`
    Gte,
    /// `field <= value`
    Lte,
    /// `field > value`
    Gt,
    /// `field < value`
    Lt,
    /// `field LIKE pattern`
    Like,
    /// `field IN (values...)`
    In,
}

impl FilterOp {
    /// Resolves a key suffix (the part after `__`) into an operator
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gte" => Some(Self::Gte),
            "lte" => Some(Self::Lte),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "like" => Some(Self::Like),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    /// The key suffix for this operator, if it has one
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            Self::Eq => None,
            Self::Gte => Some("gte"),
            Self::Lte => Some("lte"),
            Self::Gt => Some("gt"),
            Self::Lt => Some("lt"),
            Self::Like => Some("like"),
            Self::In => Some("in"),
        }
    }

    /// True for the ordering comparisons
    pub fn is_range(self) -> bool {
        matches!(self, Self::Gte | Self::Lte | Self::Gt | Self::Lt)
    }
}

/// A single resolved filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field: String,
    op: FilterOp,
    value: Value,
}

impl Filter {
    /// Builds a filter, checking that `value` suits `op`.
    pub fn new(field: impl Into<String>, op: FilterOp, value: Value) -> Result<Self, QueryError> {
        let field = field.into();
        if !is_identifier(&field) {
            return Err(QueryError::InvalidField(field));
        }

        let key = || match op.suffix() {
            Some(suffix) => format!("{field}__{suffix}"),
            None => field.clone(),
        };

        match (op, &value) {
            (FilterOp::In, Value::Array(_)) => {}
            (FilterOp::In, _) => return Err(QueryError::ExpectedList(key())),
            (_, Value::Array(_) | Value::Object(_)) => {
                return Err(QueryError::ExpectedScalar(key()));
            }
            (FilterOp::Like, Value::String(_)) => {}
            (FilterOp::Like, _) => return Err(QueryError::ExpectedText(key())),
            (op, Value::Null) if op.is_range() => {
                return Err(QueryError::NullComparison(key()));
            }
            _ => {}
        }

        if let (FilterOp::In, Value::Array(items)) = (op, &value) {
            if items
                .iter()
                .any(|item| matches!(item, Value::Array(_) | Value::Object(_)))
            {
                return Err(QueryError::ExpectedScalar(key()));
            }
        }

        Ok(Self { field, op, value })
    }

    /// Parses a filter-map key and pairs it with `value`.
    ///
    /// The key is split at its first `__`.
    pub fn parse(key: &str, value: Value) -> Result<Self, QueryError> {
        match key.split_once("__") {
            None => Self::new(key, FilterOp::Eq, value),
            Some((field, suffix)) => {
                let op = FilterOp::from_suffix(suffix).ok_or_else(|| QueryError::UnknownOperator {
                    key: key.to_owned(),
                    op: suffix.to_owned(),
                })?;
                Self::new(field, op, value)
            }
        }
    }

    /// The column being filtered
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The comparison
    pub fn op(&self) -> FilterOp {
        self.op
    }

    /// The comparand (a list for [`FilterOp::In`], a scalar otherwise)
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op.suffix() {
            Some(suffix) => write!(f, "{}__{}={}", self.field, suffix, self.value),
            None => write!(f, "{}={}", self.field, self.value),
        }
    }
}

/// An ordered conjunction of filters. Empty filters match every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters(Vec<Filter>);

impl Filters {
    /// No filters at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a filter map, resolving every key.
    ///
    /// Fails on the first key that does not parse; an unrecognised operator is
    /// an error, never a silently dropped filter.
    pub fn parse<K: AsRef<str>>(
        entries: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Self, QueryError> {
        entries
            .into_iter()
            .map(|(key, value)| Filter::parse(key.as_ref(), value))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Adds an already-resolved filter
    pub fn and(mut self, filter: Filter) -> Self {
        self.0.push(filter);
        self
    }

    /// Adds an equality filter
    pub fn equal(self, field: &str, value: impl Into<Value>) -> Result<Self, QueryError> {
        Ok(self.and(Filter::new(field, FilterOp::Eq, value.into())?))
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is filtered
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the filters in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Filters {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Filter> for Filters {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The optional arguments of a `find` query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Maximum number of records to return
    pub limit: Option<u64>,
    /// Column to sort by
    pub order_by: Option<String>,
    /// Sort descending instead of ascending
    pub descending: bool,
}

impl FindOptions {
    /// Caps the number of records returned
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sorts ascending by `column`
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    /// Flips the sort to descending
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    /// Checks the sort column, if any
    pub fn validate(&self) -> Result<(), QueryError> {
        match &self.order_by {
            Some(column) => check_identifier(column),
            None => Ok(()),
        }
    }
}

/// True if `name` is safe to use as a collection or column name
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Fails with [`QueryError::InvalidIdentifier`] unless `name` is an identifier
pub fn check_identifier(name: &str) -> Result<(), QueryError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(QueryError::InvalidIdentifier(name.to_owned()))
    }
}

/// A query that cannot be expressed in the filter language.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The key's operator suffix is not one of the supported operators
    #[error("unknown operator \"{op}\" in filter key \"{key}\"")]
    UnknownOperator {
        /// The full filter key
        key: String,
        /// The unrecognised suffix
        op: String,
    },
    /// The field part of a key is not a plain identifier
    #[error("invalid field name \"{0}\"")]
    InvalidField(String),
    /// A collection or sort column is not a plain identifier
    #[error("invalid identifier \"{0}\"")]
    InvalidIdentifier(String),
    /// An `in` filter was not given a list
    #[error("filter \"{0}\" expects a list")]
    ExpectedList(String),
    /// A non-`in` filter was given a list or an object
    #[error("filter \"{0}\" expects a single value")]
    ExpectedScalar(String),
    /// A `like` filter was not given a string pattern
    #[error("filter \"{0}\" expects a text pattern")]
    ExpectedText(String),
    /// An ordering comparison against null
    #[error("filter \"{0}\" cannot compare against null")]
    NullComparison(String),
}
