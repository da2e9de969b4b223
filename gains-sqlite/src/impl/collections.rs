//! Collection management beyond the read-only store interface.

use super::query;
use crate::{Db, Error};
use gains_core::{
    filter::{Filters, FindOptions, check_identifier},
    models::Record,
    ports::RecordStore as _,
};
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite};
use tracing::{Level, event};

/// One column of a collection, as declared in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Declared type, empty when the column has none
    #[serde(rename = "type")]
    pub data_type: String,
    /// Whether the column accepts null
    pub nullable: bool,
    /// The default value expression, if any
    pub default: Option<String>,
    /// Whether the column is part of the primary key
    pub primary_key: bool,
}

/// The shape and size of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    /// Collection name
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<ColumnInfo>,
    /// Number of records currently stored
    pub row_count: u64,
}

impl Db {
    /// Names of every collection, in alphabetical order.
    ///
    /// SQLite's internal tables and the migration bookkeeping are left out.
    pub async fn collections(&self) -> Result<Vec<String>, Error> {
        let names = sqlx::query_scalar(
            r#"
            select
                name
            from
                sqlite_master
            where
                type = 'table'
            and
                name not like 'sqlite\_%' escape '\'
            and
                name not like '\_sqlx\_%' escape '\'
            order by
                name
            "#,
        )
        .fetch_all(&self.reader)
        .await?;
        Ok(names)
    }

    /// Describes the columns and row count of `collection`.
    ///
    /// An unknown collection is an error.
    pub async fn collection_info(&self, collection: &str) -> Result<CollectionInfo, Error> {
        check_identifier(collection)?;

        let columns: Vec<(String, String, bool, Option<String>, i64)> = sqlx::query_as(
            r#"
            select
                name, type, "notnull", dflt_value, pk
            from
                pragma_table_info(?)
            order by
                cid
            "#,
        )
        .bind(collection)
        .fetch_all(&self.reader)
        .await?;

        let row_count = self.count(collection, &Filters::new()).await?;

        Ok(CollectionInfo {
            name: collection.to_owned(),
            columns: columns
                .into_iter()
                .map(|(name, data_type, not_null, default, pk)| ColumnInfo {
                    name,
                    data_type,
                    nullable: !not_null,
                    default,
                    primary_key: pk > 0,
                })
                .collect(),
            row_count,
        })
    }

    /// Up to `n` records from `collection`, in storage order.
    pub async fn sample(&self, collection: &str, n: u64) -> Result<Vec<Record>, Error> {
        self.find(collection, &Default::default(), &FindOptions::default().limit(n))
            .await
    }

    /// Insert one record into `collection`.
    ///
    /// Fields become columns of the same name. Nested arrays and objects are
    /// stored as JSON text.
    pub async fn insert(&self, collection: &str, record: &Record) -> Result<(), Error> {
        self.insert_all(collection, std::slice::from_ref(record))
            .await
            .map(|_| ())
    }

    /// Insert every record into `collection` inside a single transaction.
    ///
    /// Either all records are written or none are. Returns the number of rows
    /// inserted.
    pub async fn insert_all(&self, collection: &str, records: &[Record]) -> Result<u64, Error> {
        check_identifier(collection)?;
        for field in records.iter().flat_map(|record| record.keys()) {
            check_identifier(field)?;
        }

        let mut tx = self.writer.begin().await?;
        let mut inserted = 0;
        for record in records {
            let mut builder = insert_statement(collection, record);
            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        event!(Level::DEBUG, collection, inserted, "inserted records");
        Ok(inserted)
    }
}

fn insert_statement<'a>(collection: &str, record: &Record) -> QueryBuilder<'a, Sqlite> {
    let mut builder = QueryBuilder::new(format!("insert into \"{collection}\""));
    if record.is_empty() {
        builder.push(" default values");
        return builder;
    }

    builder.push(" (");
    let mut columns = builder.separated(", ");
    for field in record.keys() {
        columns.push(format_args!("\"{field}\""));
    }
    columns.push_unseparated(") values (");

    let mut values = builder.separated(", ");
    for value in record.values() {
        match query::bind_value(value) {
            query::Bound::Null => values.push_bind(None::<String>),
            query::Bound::Integer(n) => values.push_bind(n),
            query::Bound::Real(x) => values.push_bind(x),
            query::Bound::Text(s) => values.push_bind(s),
        };
    }
    values.push_unseparated(")");
    builder
}
