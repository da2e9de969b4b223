use crate::compute_gains;
use gains_core::{
    models::GainReport,
    ports::{ExchangeRepository as _, RecordStore, WarehouseRepository as _},
    validate::{Rejection, validate_records},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{Level, event};

/// Settings injected into a [`GainsAnalyzer`] at construction time.
///
/// # Examples
///
/// ```
/// use gains_engine::AnalyzerConfig;
///
/// let config = AnalyzerConfig::default();
/// assert_eq!(config.reporter_name, "Unknown Reporter");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalyzerConfig {
    /// Name stamped on every report as the requester
    #[serde(default = "default_reporter_name")]
    pub reporter_name: String,
}

fn default_reporter_name() -> String {
    "Unknown Reporter".to_owned()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            reporter_name: default_reporter_name(),
        }
    }
}

/// A finished analysis: the report plus the records left out of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GainAnalysis {
    /// The gains report built from every valid exchange
    pub report: GainReport,
    /// Records that failed validation and were excluded from the report
    pub rejections: Vec<Rejection>,
}

/// Why an analysis could not produce a report.
#[derive(Debug, Error)]
pub enum AnalysisError<E: std::error::Error + 'static> {
    /// The warehouse is not in the warehouse directory
    #[error("warehouse {0} not found")]
    NotFound(String),
    /// The record store failed to answer a query
    #[error("record store query failed")]
    Store(#[source] E),
}

/// Runs gains analyses against a record store.
///
/// Each call to [`GainsAnalyzer::analyze_warehouse_gains`] is independent; an
/// analyzer can be shared between tasks as long as its store can.
#[derive(Debug, Clone)]
pub struct GainsAnalyzer<S> {
    store: S,
    config: AnalyzerConfig,
}

impl<S: RecordStore> GainsAnalyzer<S> {
    /// Create an analyzer over `store`
    pub fn new(store: S, config: AnalyzerConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The injected configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyse the gains of a single warehouse.
    ///
    /// Fails with [`AnalysisError::NotFound`] if the warehouse is unknown and
    /// with [`AnalysisError::Store`] if any query fails. A known warehouse with
    /// no activity yields an all-zero report. Records that fail validation are
    /// skipped and returned alongside the report.
    pub async fn analyze_warehouse_gains(
        &self,
        warehouse_id: &str,
        analysis_date: OffsetDateTime,
    ) -> Result<GainAnalysis, AnalysisError<S::Error>> {
        let exists = self
            .store
            .warehouse_exists(warehouse_id)
            .await
            .map_err(|err| store_failure(warehouse_id, err))?;
        if !exists {
            return Err(AnalysisError::NotFound(warehouse_id.to_owned()));
        }

        let records = self
            .store
            .fetch_warehouse_exchanges(warehouse_id)
            .await
            .map_err(|err| store_failure(warehouse_id, err))?;

        let validated = validate_records(records);
        for rejection in &validated.rejections {
            event!(
                Level::WARN,
                warehouse_id,
                index = rejection.index,
                exchange_id = rejection.exchange_id.as_deref(),
                err = rejection.error.to_string(),
                "rejected exchange record"
            );
        }

        let report = compute_gains(
            warehouse_id,
            &validated.exchanges,
            analysis_date,
            self.config.reporter_name.as_str(),
        );

        event!(
            Level::INFO,
            warehouse_id,
            transactions = report.total_transactions,
            rejected = validated.rejections.len(),
            gain_loss = %report.total_gain_loss,
            "analysis complete"
        );

        Ok(GainAnalysis {
            report,
            rejections: validated.rejections,
        })
    }
}

fn store_failure<E: std::error::Error + 'static>(warehouse_id: &str, err: E) -> AnalysisError<E> {
    event!(Level::ERROR, warehouse_id, err = err.to_string());
    AnalysisError::Store(err)
}
