//! Command-line interface definition and parsing.

use clap::{Parser, Subcommand};
use gains_core::models::Value;
use std::path::PathBuf;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Command-line arguments for the gains report tool.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, env = "APP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Compute the gains report for a warehouse
    Analyze {
        /// The warehouse to analyse
        warehouse_id: String,
        /// Analysis timestamp (RFC 3339); defaults to now
        #[arg(long, value_parser = parse_instant)]
        as_of: Option<OffsetDateTime>,
    },
    /// Print the records of a collection matching every filter
    Find {
        /// The collection to query
        collection: String,
        /// A `key=value` filter, e.g. `price_paid_usd__gte=1000`
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, Value)>,
        /// Maximum number of records
        #[arg(long)]
        limit: Option<u64>,
        /// Column to sort by
        #[arg(long)]
        order_by: Option<String>,
        /// Sort descending
        #[arg(long, requires = "order_by")]
        desc: bool,
    },
    /// Count the records of a collection matching every filter
    Count {
        /// The collection to query
        collection: String,
        /// A `key=value` filter
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, Value)>,
    },
    /// List the collections in the database
    Tables,
    /// Show the columns and row count of a collection
    Describe {
        /// The collection to describe
        collection: String,
    },
    /// Insert every record of a JSON array file into a collection
    Load {
        /// The target collection
        collection: String,
        /// File holding a JSON array of objects
        file: PathBuf,
    },
}

impl Cli {
    /// Parse command-line arguments.
    pub fn import() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

/// Splits a `key=value` argument.
///
/// The value is read as JSON when it parses (so `5`, `null` and `["a","b"]`
/// keep their types) and as a plain string otherwise.
pub fn parse_filter(arg: &str) -> Result<(String, Value), String> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got \"{arg}\""))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
    Ok((key.to_owned(), value))
}

fn parse_instant(arg: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(arg, &Rfc3339)
}
