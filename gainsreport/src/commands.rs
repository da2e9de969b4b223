use crate::Commands;
use anyhow::Context as _;
use gains_core::{
    filter::{Filters, FindOptions},
    models::Record,
    ports::RecordStore as _,
};
use gains_engine::{AnalyzerConfig, GainsAnalyzer};
use gains_sqlite::Db;
use serde::Serialize;
use std::{fs, io::Write};
use time::OffsetDateTime;
use tracing::{Level, event};

/// Runs `command` against `db`, writing its JSON result to `out`.
pub async fn run(
    db: Db,
    analyzer: AnalyzerConfig,
    command: Commands,
    pretty: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            warehouse_id,
            as_of,
        } => {
            let analyzer = GainsAnalyzer::new(db, analyzer);
            let analysis = analyzer
                .analyze_warehouse_gains(
                    &warehouse_id,
                    as_of.unwrap_or_else(OffsetDateTime::now_utc),
                )
                .await?;
            emit(out, &analysis, pretty)
        }
        Commands::Find {
            collection,
            filters,
            limit,
            order_by,
            desc,
        } => {
            let options = FindOptions {
                limit,
                order_by,
                descending: desc,
            };
            let records = db
                .find(&collection, &Filters::parse(filters)?, &options)
                .await?;
            emit(out, &records, pretty)
        }
        Commands::Count {
            collection,
            filters,
        } => {
            let count = db.count(&collection, &Filters::parse(filters)?).await?;
            emit(out, &count, pretty)
        }
        Commands::Tables => emit(out, &db.collections().await?, pretty),
        Commands::Describe { collection } => {
            emit(out, &db.collection_info(&collection).await?, pretty)
        }
        Commands::Load { collection, file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let records: Vec<Record> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a JSON array of objects", file.display()))?;
            let inserted = db.insert_all(&collection, &records).await?;
            event!(Level::INFO, collection, inserted, "loaded records");
            emit(out, &serde_json::json!({ "inserted": inserted }), pretty)
        }
    }
}

fn emit<T: Serialize>(out: &mut impl Write, value: &T, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

