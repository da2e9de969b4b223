use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

/// Gains or losses for one commodity type within a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityGains {
    /// The commodity category, e.g. "Wheat"
    pub commodity_type: String,
    /// Money spent acquiring this commodity
    pub total_inflow_cost: Decimal,
    /// Money received disposing of this commodity
    pub total_outflow_value: Decimal,
    /// `total_outflow_value - total_inflow_cost`
    pub total_gain_loss: Decimal,
    /// Number of exchanges that contributed
    pub number_of_transactions: u64,
}

/// The inflow/outflow gains report for a single warehouse.
///
/// A report is produced fresh for every analysis and never mutated after. The
/// per-commodity breakdown always sums to the report-level totals; see
/// [`GainReport::verify_totals`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GainReport {
    /// The analysed warehouse
    pub warehouse_id: String,
    /// Who requested the analysis
    pub reporter_name: String,
    /// When the analysis was performed
    #[serde(with = "time::serde::rfc3339")]
    pub analysis_date: OffsetDateTime,

    /// Total money spent on acquisitions
    pub total_inflow_cost: Decimal,
    /// Total money received from disposals
    pub total_outflow_value: Decimal,
    /// `total_outflow_value - total_inflow_cost`
    pub total_gain_loss: Decimal,
    /// Number of exchanges that contributed
    pub total_transactions: u64,

    /// Breakdown by commodity type, ordered by `commodity_type`
    pub gains_by_commodity: Vec<CommodityGains>,

    /// Timestamp of the earliest contributing exchange
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub analysis_start_date: Option<OffsetDateTime>,
    /// Timestamp of the latest contributing exchange
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub analysis_end_date: Option<OffsetDateTime>,
}

impl GainReport {
    /// Checks that the breakdown reconciles with the totals.
    ///
    /// Each of inflow cost, outflow value, gain/loss and transaction count must
    /// sum exactly across `gains_by_commodity` to the report-level field, and
    /// every gain/loss must equal its outflow minus its inflow.
    pub fn verify_totals(&self) -> Result<(), InvariantViolation> {
        let mut inflow = Decimal::ZERO;
        let mut outflow = Decimal::ZERO;
        let mut gain_loss = Decimal::ZERO;
        let mut transactions = 0u64;

        for entry in &self.gains_by_commodity {
            if entry.total_gain_loss != entry.total_outflow_value - entry.total_inflow_cost {
                return Err(InvariantViolation::CommodityGainLoss(
                    entry.commodity_type.clone(),
                ));
            }
            inflow += entry.total_inflow_cost;
            outflow += entry.total_outflow_value;
            gain_loss += entry.total_gain_loss;
            transactions += entry.number_of_transactions;
        }

        if self.total_gain_loss != self.total_outflow_value - self.total_inflow_cost {
            return Err(InvariantViolation::ReportGainLoss);
        }

        let mismatch = |field: &'static str, breakdown: String, total: String| {
            InvariantViolation::Breakdown {
                field,
                breakdown,
                total,
            }
        };

        if inflow != self.total_inflow_cost {
            return Err(mismatch(
                "total_inflow_cost",
                inflow.to_string(),
                self.total_inflow_cost.to_string(),
            ));
        }
        if outflow != self.total_outflow_value {
            return Err(mismatch(
                "total_outflow_value",
                outflow.to_string(),
                self.total_outflow_value.to_string(),
            ));
        }
        if gain_loss != self.total_gain_loss {
            return Err(mismatch(
                "total_gain_loss",
                gain_loss.to_string(),
                self.total_gain_loss.to_string(),
            ));
        }
        if transactions != self.total_transactions {
            return Err(mismatch(
                "total_transactions",
                transactions.to_string(),
                self.total_transactions.to_string(),
            ));
        }

        Ok(())
    }

    /// Looks up the breakdown entry for `commodity_type`
    pub fn commodity(&self, commodity_type: &str) -> Option<&CommodityGains> {
        self.gains_by_commodity
            .binary_search_by(|entry| entry.commodity_type.as_str().cmp(commodity_type))
            .ok()
            .map(|index| &self.gains_by_commodity[index])
    }
}

/// A report whose numbers do not add up.
///
/// This never happens for reports built by the engine; it exists so that
/// tests (and paranoid consumers) can state the reconciliation precisely.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A per-commodity total does not sum to the report total
    #[error("{field}: breakdown sums to {breakdown}, report says {total}")]
    Breakdown {
        /// The report field that failed to reconcile
        field: &'static str,
        /// Sum across the breakdown
        breakdown: String,
        /// Value on the report
        total: String,
    },
    /// The report's gain/loss is not outflow minus inflow
    #[error("report gain/loss is not outflow value minus inflow cost")]
    ReportGainLoss,
    /// A commodity's gain/loss is not its outflow minus its inflow
    #[error("gain/loss for {0} is not outflow value minus inflow cost")]
    CommodityGainLoss(String),
}
