/// A single value read from or written to a record store.
pub type Value = serde_json::Value;

/// One row of a collection, keyed by column name in column order.
///
/// Records are untyped; [`crate::validate`] is responsible for turning the
/// ones that describe exchanges into [`crate::models::Exchange`] values.
pub type Record = serde_json::Map<String, Value>;
