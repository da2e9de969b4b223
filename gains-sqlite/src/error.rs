use gains_core::filter::QueryError;
use thiserror::Error;

/// Everything that can go wrong talking to the database.
#[derive(Debug, Error)]
pub enum Error {
    /// The database rejected or failed a statement
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
    /// The schema could not be brought up to date
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    /// The query was malformed before it reached the database
    #[error(transparent)]
    Query(#[from] QueryError),
}
