use crate::filter::{Filters, FindOptions, QueryError};
use crate::models::Record;
use std::future::Future;

/// Read access to named collections of records.
///
/// This is the only place the core touches storage. Implementations translate
/// [`Filters`] into their native query language; every filter is combined with
/// AND and empty filters match the whole collection.
///
/// A failed query must come back as `Err`. `Ok` with an empty `Vec` means the
/// query ran and nothing matched, and callers rely on being able to tell the
/// two apart.
pub trait RecordStore: Sync {
    /// The error produced when a query cannot be run.
    ///
    /// Malformed queries (bad collection or column names) surface through
    /// the `From<QueryError>` conversion.
    type Error: std::error::Error + From<QueryError> + Send + Sync + 'static;

    /// Fetch the records of `collection` matching every filter.
    fn find(
        &self,
        collection: &str,
        filters: &Filters,
        options: &FindOptions,
    ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send;

    /// Count the records of `collection` matching every filter.
    fn count(
        &self,
        collection: &str,
        filters: &Filters,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}
