//! Settings for opening the ledger database.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of the ledger and what to do when it is absent.
///
/// Leaving `database_path` unset gives a private in-memory ledger that
/// vanishes with the [`crate::Db`], which is what the tests use.
///
/// ```
/// use gains_sqlite::config::SqliteConfig;
/// use std::path::PathBuf;
///
/// assert_eq!(SqliteConfig::default().database_path, None);
///
/// let on_disk = SqliteConfig {
///     database_path: Some(PathBuf::from("ledger.db")),
///     create_if_missing: false,
/// };
/// assert!(!on_disk.create_if_missing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SqliteConfig {
    /// Ledger file; `None` keeps the ledger in memory
    pub database_path: Option<PathBuf>,

    /// Start an empty ledger when the file is missing, instead of failing
    #[serde(default = "create_by_default")]
    pub create_if_missing: bool,
}

fn create_by_default() -> bool {
    true
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            create_if_missing: create_by_default(),
        }
    }
}
