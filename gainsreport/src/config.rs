//! Settings for a `gainsreport` run.

use crate::Cli;
use anyhow::bail;
use gains_engine::AnalyzerConfig;
use gains_sqlite::config::SqliteConfig;
use serde::{Deserialize, Serialize};

/// Everything a run needs besides its subcommand.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AppConfig {
    /// The ledger to read and load into
    #[serde(default)]
    pub database: SqliteConfig,

    /// Passed through to the analyzer untouched
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

impl AppConfig {
    /// Builds the settings for `cli`.
    ///
    /// Built-in defaults are overridden by the TOML file named with
    /// `--config`, which is in turn overridden by the environment. An
    /// environment variable names its setting as `APP_` followed by the
    /// section and key joined with `__`:
    ///
    /// ```bash
    /// APP_DATABASE__DATABASE_PATH=/srv/ledger.db \
    /// APP_ANALYZER__REPORTER_NAME="Quarterly Audit" \
    ///     gainsreport analyze WH_TEST_123
    /// ```
    ///
    /// A `--config` path that does not exist is an error.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut layers = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = &cli.config {
            if !path.exists() {
                bail!("no config file at {}", path.display());
            }
            layers = layers.add_source(config::File::from(path.as_path()));
        }

        let environment = config::Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);

        Ok(layers.add_source(environment).build()?.try_deserialize()?)
    }
}
