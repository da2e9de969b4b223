#![warn(missing_docs)]
//! `gainsreport` runs warehouse gains analyses against a SQLite exchange
//! ledger and offers a few commands for inspecting and loading the ledger.

mod cli;
pub use cli::{Cli, Commands, parse_filter};

mod config;
pub use config::AppConfig;

/// Execution of each subcommand.
pub mod commands;
