use crate::Map;
use gains_core::models::{CommodityGains, Direction, Exchange, GainReport};
use rust_decimal::Decimal;
use std::borrow::Borrow;
use time::OffsetDateTime;
use tracing::{Level, event};

/// Running sums for one commodity type.
#[derive(Debug, Default)]
struct Tally {
    inflow: Decimal,
    outflow: Decimal,
    count: u64,
}

/// Computes the gains report for `warehouse_id` from its exchanges.
///
/// Every exchange where the warehouse is the destination counts as an inflow
/// (its price is an acquisition cost); every exchange where it is the source
/// counts as an outflow (its price is disposal proceeds). Exchanges that touch
/// neither end, or carry a standard other than bulk, are skipped. All sums are
/// exact decimals and the result does not depend on the order of `exchanges`.
///
/// The report is always internally consistent: the breakdown, which is sorted
/// by commodity type, sums to the totals. An empty input gives an all-zero
/// report with no breakdown and no start or end date.
pub fn compute_gains<I>(
    warehouse_id: &str,
    exchanges: I,
    analysis_date: OffsetDateTime,
    reporter_name: impl Into<String>,
) -> GainReport
where
    I: IntoIterator,
    I::Item: Borrow<Exchange>,
{
    let mut total_inflow_cost = Decimal::ZERO;
    let mut total_outflow_value = Decimal::ZERO;
    let mut total_transactions = 0u64;
    let mut by_commodity: Map<String, Tally> = Map::default();
    let mut first: Option<OffsetDateTime> = None;
    let mut last: Option<OffsetDateTime> = None;

    for exchange in exchanges {
        let exchange = exchange.borrow();
        if !exchange.is_bulk() {
            continue;
        }

        let Some(direction) = exchange.direction_for(warehouse_id) else {
            event!(
                Level::DEBUG,
                exchange_id = exchange.exchange_id(),
                warehouse_id,
                "skipping exchange that does not touch the warehouse"
            );
            continue;
        };

        let amount = exchange.price_paid_usd();
        let tally = by_commodity
            .entry(exchange.item_type().to_owned())
            .or_default();
        match direction {
            Direction::Inflow => {
                total_inflow_cost += amount;
                tally.inflow += amount;
            }
            Direction::Outflow => {
                total_outflow_value += amount;
                tally.outflow += amount;
            }
        }
        tally.count += 1;
        total_transactions += 1;

        let timestamp = exchange.timestamp();
        first = Some(first.map_or(timestamp, |t| t.min(timestamp)));
        last = Some(last.map_or(timestamp, |t| t.max(timestamp)));
    }

    by_commodity.sort_unstable_keys();
    let gains_by_commodity = by_commodity
        .into_iter()
        .map(|(commodity_type, tally)| CommodityGains {
            commodity_type,
            total_inflow_cost: tally.inflow,
            total_outflow_value: tally.outflow,
            total_gain_loss: tally.outflow - tally.inflow,
            number_of_transactions: tally.count,
        })
        .collect();

    let report = GainReport {
        warehouse_id: warehouse_id.to_owned(),
        reporter_name: reporter_name.into(),
        analysis_date,
        total_inflow_cost,
        total_outflow_value,
        total_gain_loss: total_outflow_value - total_inflow_cost,
        total_transactions,
        gains_by_commodity,
        analysis_start_date: first,
        analysis_end_date: last,
    };

    debug_assert_eq!(report.verify_totals(), Ok(()));
    report
}
