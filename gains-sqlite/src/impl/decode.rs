use gains_core::models::{Record, Value};
use sqlx::{Column as _, Row as _, TypeInfo as _, ValueRef as _, sqlite::SqliteRow};

/// Reads a row as a record, keyed by column name in column order.
pub(super) fn record(row: &SqliteRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();
    for column in row.columns() {
        let ordinal = column.ordinal();
        let raw = row.try_get_raw(ordinal)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            // the storage class of this value, not the declared column type
            match raw.type_info().name() {
                "INTEGER" => Value::from(row.try_get_unchecked::<i64, _>(ordinal)?),
                "REAL" => serde_json::Number::from_f64(row.try_get_unchecked::<f64, _>(ordinal)?)
                    .map_or(Value::Null, Value::Number),
                "BLOB" => {
                    let bytes = row.try_get_unchecked::<Vec<u8>, _>(ordinal)?;
                    Value::String(String::from_utf8_lossy(&bytes).into_owned())
                }
                _ => Value::String(row.try_get_unchecked::<String, _>(ordinal)?),
            }
        };

        record.insert(column.name().to_owned(), value);
    }
    Ok(record)
}
