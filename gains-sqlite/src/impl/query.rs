//! Compiles [`Filters`] into SQL.
//!
//! Every filter becomes one predicate and the predicates are joined with
//! `and`. Values are always bound, never spliced; column and table names are
//! identifiers checked upstream and quoted here.

use gains_core::{
    filter::{Filter, FilterOp, Filters, FindOptions},
    models::Value,
};
use sqlx::{QueryBuilder, Sqlite};

pub(super) fn select<'a>(collection: &str, filters: &Filters) -> QueryBuilder<'a, Sqlite> {
    let mut builder = QueryBuilder::new(format!("select * from \"{collection}\""));
    push_where(&mut builder, filters);
    builder
}

pub(super) fn count<'a>(collection: &str, filters: &Filters) -> QueryBuilder<'a, Sqlite> {
    let mut builder = QueryBuilder::new(format!("select count(*) from \"{collection}\""));
    push_where(&mut builder, filters);
    builder
}

pub(super) fn push_options(builder: &mut QueryBuilder<'_, Sqlite>, options: &FindOptions) {
    if let Some(column) = &options.order_by {
        builder.push(format_args!(" order by \"{column}\""));
        builder.push(if options.descending { " desc" } else { " asc" });
    }
    if let Some(limit) = options.limit {
        builder.push(" limit ");
        builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
}

fn push_where(builder: &mut QueryBuilder<'_, Sqlite>, filters: &Filters) {
    for (i, filter) in filters.iter().enumerate() {
        builder.push(if i == 0 { " where " } else { " and " });
        push_predicate(builder, filter);
    }
}

fn push_predicate(builder: &mut QueryBuilder<'_, Sqlite>, filter: &Filter) {
    let field = filter.field();
    let value = filter.value();

    let symbol = match filter.op() {
        FilterOp::Eq if value.is_null() => {
            builder.push(format_args!("\"{field}\" is null"));
            return;
        }
        FilterOp::In => {
            push_in(builder, field, value);
            return;
        }
        FilterOp::Eq => "=",
        FilterOp::Gte => ">=",
        FilterOp::Lte => "<=",
        FilterOp::Gt => ">",
        FilterOp::Lt => "<",
        FilterOp::Like => "like",
    };

    push_column(builder, field, value.is_number());
    builder.push(format_args!(" {symbol} "));
    push_value(builder, value);
}

fn push_in(builder: &mut QueryBuilder<'_, Sqlite>, field: &str, value: &Value) {
    let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
    if items.is_empty() {
        builder.push("0 = 1");
        return;
    }

    push_column(builder, field, items.iter().all(Value::is_number));
    builder.push(" in (");
    let mut separated = builder.separated(", ");
    for item in items {
        push_value_separated(&mut separated, item);
    }
    separated.push_unseparated(")");
}

// Amounts are stored as text, so numeric comparisons go through a numeric
// view of the column. Values that are neither numbers nor numeric-looking
// text map to null and so never match.
fn push_column(builder: &mut QueryBuilder<'_, Sqlite>, field: &str, numeric: bool) {
    if numeric {
        builder.push(format_args!(
            "(case \
             when typeof(\"{field}\") in ('integer', 'real') then \"{field}\" \
             when typeof(\"{field}\") = 'text' \
             and trim(\"{field}\") glob '*[0-9]*' \
             and trim(\"{field}\") not glob '*[^0-9.+-]*' \
             then cast(trim(\"{field}\") as numeric) \
             end)"
        ));
    } else {
        builder.push(format_args!("\"{field}\""));
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match bind_value(value) {
        Bound::Null => builder.push_bind(None::<String>),
        Bound::Integer(n) => builder.push_bind(n),
        Bound::Real(x) => builder.push_bind(x),
        Bound::Text(s) => builder.push_bind(s),
    };
}

fn push_value_separated<Sep: std::fmt::Display>(
    separated: &mut sqlx::query_builder::Separated<'_, '_, Sqlite, Sep>,
    value: &Value,
) {
    match bind_value(value) {
        Bound::Null => separated.push_bind(None::<String>),
        Bound::Integer(n) => separated.push_bind(n),
        Bound::Real(x) => separated.push_bind(x),
        Bound::Text(s) => separated.push_bind(s),
    };
}

/// A JSON value in the shape SQLite binds it.
pub(super) enum Bound {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

pub(super) fn bind_value(value: &Value) -> Bound {
    match value {
        Value::Null => Bound::Null,
        Value::Bool(b) => Bound::Integer(i64::from(*b)),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Bound::Integer(i),
            (None, Some(x)) => Bound::Real(x),
            (None, None) => Bound::Text(n.to_string()),
        },
        Value::String(s) => Bound::Text(s.clone()),
        // nested values are kept as JSON text
        Value::Array(_) | Value::Object(_) => Bound::Text(value.to_string()),
    }
}
