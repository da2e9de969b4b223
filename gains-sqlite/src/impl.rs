//! The record store implementation for the SQLite database.

use crate::{Db, Error};
use gains_core::{
    filter::{Filters, FindOptions, check_identifier},
    models::Record,
    ports::RecordStore,
};
use tracing::{Level, event};

mod collections;
pub use collections::{CollectionInfo, ColumnInfo};
mod decode;
mod query;

impl RecordStore for Db {
    type Error = Error;

    async fn find(
        &self,
        collection: &str,
        filters: &Filters,
        options: &FindOptions,
    ) -> Result<Vec<Record>, Self::Error> {
        check_identifier(collection)?;
        options.validate()?;

        if options.limit == Some(0) {
            return Ok(Vec::new());
        }

        let mut builder = query::select(collection, filters);
        query::push_options(&mut builder, options);
        event!(Level::DEBUG, collection, sql = builder.sql(), "find");

        let rows = builder.build().fetch_all(&self.reader).await?;
        let records = rows
            .iter()
            .map(decode::record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    async fn count(&self, collection: &str, filters: &Filters) -> Result<u64, Self::Error> {
        check_identifier(collection)?;

        let mut builder = query::count(collection, filters);
        event!(Level::DEBUG, collection, sql = builder.sql(), "count");

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.reader)
            .await?;
        Ok(count.unsigned_abs())
    }
}
