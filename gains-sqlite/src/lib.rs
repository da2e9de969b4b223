#![warn(missing_docs)]
//! A SQLite implementation of [`gains_core::ports::RecordStore`].
//!
//! Every table is a collection and every row is a record: columns map to
//! fields, and SQLite's storage classes map onto JSON values (integers and
//! reals become numbers, text becomes a string, null stays null and blobs are
//! read as lossy UTF-8 text).
//!
//! The bundled schema holds the `companies`, `warehouses` and `exchanges`
//! collections the analysis reads. Decimal amounts are kept as text so that
//! they survive the trip exactly.

use sqlx::sqlite;
use std::{str::FromStr, time::Duration};
use tokio::try_join;
use tracing::{Level, event};

pub mod config;
mod error;
mod r#impl;

use config::SqliteConfig;
pub use error::Error;
pub use r#impl::{CollectionInfo, ColumnInfo};

/// SQLite-backed record store.
///
/// Reads go through `reader` and writes through `writer`, which holds a single
/// connection so that writes are serialised. An in-memory database only
/// exists within one connection, so in that case both pools are the same
/// single-connection pool.
///
/// # Example
///
/// ```no_run
/// # use gains_sqlite::{Db, config::SqliteConfig};
/// # async fn example() -> Result<(), gains_sqlite::Error> {
/// let db = Db::open(&SqliteConfig::default()).await?;
/// assert!(db.collections().await?.contains(&"exchanges".to_owned()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Db {
    /// Connection pool for read operations
    pub reader: sqlx::Pool<sqlx::Sqlite>,
    /// Connection pool for write operations (limited to 1 connection)
    pub writer: sqlx::Pool<sqlx::Sqlite>,
}

impl Db {
    /// Open a connection to the specified SQLite database.
    ///
    /// Creates a new database if one doesn't exist (when `create_if_missing`
    /// is true) and applies all pending migrations.
    pub async fn open(config: &SqliteConfig) -> Result<Self, Error> {
        let db_path = config
            .database_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let options =
            sqlite::SqliteConnectOptions::from_str(db_path.as_deref().unwrap_or(":memory:"))?
                .busy_timeout(Duration::from_secs(5))
                .foreign_keys(true)
                .synchronous(sqlite::SqliteSynchronous::Normal)
                .pragma("temp_store", "memory")
                .create_if_missing(config.create_if_missing);

        let (reader, writer) = if db_path.is_some() {
            let options = options.journal_mode(sqlite::SqliteJournalMode::Wal);
            let reader = sqlite::SqlitePoolOptions::new().connect_with(options.clone());
            let writer = sqlite::SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options);
            try_join!(reader, writer)?
        } else {
            // the one connection must never be recycled, or the data goes with it
            let pool = sqlite::SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?;
            (pool.clone(), pool)
        };

        // Run any pending migrations before returning
        sqlx::migrate!("./schema").run(&writer).await?;

        event!(
            Level::DEBUG,
            database = db_path.as_deref().unwrap_or(":memory:"),
            "opened record store"
        );

        Ok(Self { reader, writer })
    }
}
