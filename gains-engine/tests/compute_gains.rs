use gains_core::models::{
    CommodityStandard, Exchange, ExchangeData, GainReport, MAX_AMOUNT, MINT_BURN_SENTINEL,
};
use gains_engine::compute_gains;
use rstest::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::{Duration, OffsetDateTime, macros::datetime};

const WAREHOUSE: &str = "WH_TEST_123";
const ANALYSIS_DATE: OffsetDateTime = datetime!(2024-01-01 00:00 UTC);

/// Builds a bulk exchange; `day` offsets the timestamp from 2023-06-01.
fn exchange(
    id: &str,
    from: &str,
    to: &str,
    item_type: &str,
    quantity: Decimal,
    price: Decimal,
    day: i64,
) -> Exchange {
    Exchange::new(ExchangeData {
        exchange_id: id.into(),
        from_warehouse: from.into(),
        to_warehouse: to.into(),
        brand_manufacturer: "Generic Supplier".into(),
        item_type: item_type.into(),
        commodity_standard: CommodityStandard::Bulk,
        quantity,
        unit: "tons".into(),
        price_paid_usd: price,
        timestamp: datetime!(2023-06-01 10:00 UTC) + Duration::days(day),
        batch_id: None,
        item_ids: None,
    })
    .unwrap()
}

fn analyze(exchanges: &[Exchange]) -> GainReport {
    compute_gains(WAREHOUSE, exchanges, ANALYSIS_DATE, "tester")
}

#[fixture]
fn mixed_ledger() -> Vec<Exchange> {
    vec![
        exchange("EX_1", "WH_SUPPLIER", WAREHOUSE, "Wheat", dec!(50), dec!(10000), 0),
        exchange("EX_2", "WH_MILL", WAREHOUSE, "Steel", dec!(10), dec!(25000), 3),
        exchange("EX_3", WAREHOUSE, "WH_BAKERY", "Wheat", dec!(40), dec!(12000), 14),
    ]
}

#[test]
fn empty_input_gives_zero_report() {
    let report = analyze(&[]);

    assert_eq!(report.warehouse_id, WAREHOUSE);
    assert_eq!(report.reporter_name, "tester");
    assert_eq!(report.analysis_date, ANALYSIS_DATE);
    assert_eq!(report.total_inflow_cost, Decimal::ZERO);
    assert_eq!(report.total_outflow_value, Decimal::ZERO);
    assert_eq!(report.total_gain_loss, Decimal::ZERO);
    assert_eq!(report.total_transactions, 0);
    assert!(report.gains_by_commodity.is_empty());
    assert_eq!(report.analysis_start_date, None);
    assert_eq!(report.analysis_end_date, None);
}

#[rstest]
#[case::round(dec!(20000))]
#[case::cents(dec!(1234.56))]
#[case::cents_only(dec!(0.01))]
fn single_inflow_is_a_loss_of_its_cost(#[case] amount: Decimal) {
    let report = analyze(&[exchange(
        "EX_1",
        MINT_BURN_SENTINEL,
        WAREHOUSE,
        "Oil",
        dec!(1),
        amount,
        0,
    )]);

    assert_eq!(report.total_gain_loss, -amount);
    assert_eq!(report.gains_by_commodity.len(), 1);
    assert_eq!(report.gains_by_commodity[0].total_gain_loss, -amount);
    assert_eq!(report.gains_by_commodity[0].number_of_transactions, 1);
}

#[test]
fn buy_then_sell_wheat() {
    let report = analyze(&[
        exchange("EX_1", "WH_FARM", WAREHOUSE, "Wheat", dec!(100), dec!(20000.00), 0),
        exchange("EX_2", WAREHOUSE, "WH_BAKERY", "Wheat", dec!(50), dec!(12000.00), 5),
    ]);

    assert_eq!(report.total_inflow_cost, dec!(20000.00));
    assert_eq!(report.total_outflow_value, dec!(12000.00));
    assert_eq!(report.total_gain_loss, dec!(-8000.00));
    assert_eq!(report.total_transactions, 2);

    let wheat = report.commodity("Wheat").unwrap();
    assert_eq!(wheat.total_gain_loss, dec!(-8000.00));
    assert_eq!(wheat.number_of_transactions, 2);
    assert_eq!(report.gains_by_commodity.len(), 1);
}

#[rstest]
fn breakdown_by_commodity(mixed_ledger: Vec<Exchange>) {
    let report = analyze(&mixed_ledger);

    assert_eq!(report.total_inflow_cost, dec!(35000));
    assert_eq!(report.total_outflow_value, dec!(12000));
    assert_eq!(report.total_gain_loss, dec!(-23000));
    assert_eq!(report.total_transactions, 3);

    let commodities: Vec<_> = report
        .gains_by_commodity
        .iter()
        .map(|c| c.commodity_type.as_str())
        .collect();
    assert_eq!(commodities, ["Steel", "Wheat"]);

    let wheat = report.commodity("Wheat").unwrap();
    assert_eq!(wheat.total_gain_loss, dec!(2000));
    assert_eq!(wheat.number_of_transactions, 2);

    let steel = report.commodity("Steel").unwrap();
    assert_eq!(steel.total_inflow_cost, dec!(25000));
    assert_eq!(steel.total_outflow_value, dec!(0));
    assert_eq!(steel.total_gain_loss, dec!(-25000));
    assert_eq!(steel.number_of_transactions, 1);

    assert_eq!(report.verify_totals(), Ok(()));
}

#[rstest]
fn tracks_first_and_last_timestamps(mixed_ledger: Vec<Exchange>) {
    let report = analyze(&mixed_ledger);
    assert_eq!(report.analysis_start_date, Some(datetime!(2023-06-01 10:00 UTC)));
    assert_eq!(report.analysis_end_date, Some(datetime!(2023-06-15 10:00 UTC)));
}

#[rstest]
fn ignores_exchanges_elsewhere(mut mixed_ledger: Vec<Exchange>) {
    let expected = analyze(&mixed_ledger);
    mixed_ledger.push(exchange(
        "EX_FOREIGN",
        "WH_OTHER",
        "WH_ELSEWHERE",
        "Copper",
        dec!(5),
        dec!(999),
        30,
    ));

    let report = analyze(&mixed_ledger);
    assert_eq!(report, expected);
    assert!(report.commodity("Copper").is_none());
}

#[rstest]
fn order_does_not_matter(mixed_ledger: Vec<Exchange>) {
    let expected = analyze(&mixed_ledger);

    let mut reversed = mixed_ledger.clone();
    reversed.reverse();
    assert_eq!(analyze(&reversed), expected);

    let mut rotated = mixed_ledger;
    rotated.rotate_left(1);
    assert_eq!(analyze(&rotated), expected);
}

#[rstest]
fn rerunning_is_idempotent(mixed_ledger: Vec<Exchange>) {
    assert_eq!(analyze(&mixed_ledger), analyze(&mixed_ledger));
}

#[test]
fn outflow_only_commodity_is_reported() {
    let report = analyze(&[exchange(
        "EX_1",
        WAREHOUSE,
        MINT_BURN_SENTINEL,
        "Coffee",
        dec!(3),
        dec!(450.25),
        0,
    )]);

    let coffee = report.commodity("Coffee").unwrap();
    assert_eq!(coffee.total_inflow_cost, Decimal::ZERO);
    assert_eq!(coffee.total_gain_loss, dec!(450.25));
    assert_eq!(report.total_gain_loss, dec!(450.25));
}

#[test]
fn large_ledgers_reconcile_exactly() {
    // Amounts with awkward cents would drift under binary floating point.
    let exchanges: Vec<_> = (0..10_000)
        .map(|n| {
            let commodity = ["Wheat", "Steel", "Oil", "Corn"][n % 4];
            let price = Decimal::new(1_000 + (n as i64 * 37) % 9_973, 2);
            let id = format!("EX_{n}");
            if n % 3 == 0 {
                exchange(&id, WAREHOUSE, "WH_BUYER", commodity, dec!(1), price, 0)
            } else {
                exchange(&id, "WH_SELLER", WAREHOUSE, commodity, dec!(1), price, 0)
            }
        })
        .collect();

    let report = analyze(&exchanges);
    assert_eq!(report.total_transactions, 10_000);
    assert_eq!(report.verify_totals(), Ok(()));
    assert_eq!(
        report.total_gain_loss,
        report.total_outflow_value - report.total_inflow_cost
    );
}

#[test]
fn accepts_owned_exchanges() {
    let exchanges = vec![exchange(
        "EX_1",
        "WH_FARM",
        WAREHOUSE,
        "Wheat",
        dec!(1),
        dec!(10),
        0,
    )];
    let report = compute_gains(WAREHOUSE, exchanges, ANALYSIS_DATE, String::from("owner"));
    assert_eq!(report.reporter_name, "owner");
    assert_eq!(report.total_inflow_cost, dec!(10));
}

#[test]
fn totals_at_the_amount_cap() {
    let exchanges: Vec<_> = (0..1_000)
        .map(|n| {
            let id = format!("EX_{n}");
            exchange(&id, "WH_SELLER", WAREHOUSE, "Gold", dec!(1), MAX_AMOUNT, 0)
        })
        .collect();

    let report = analyze(&exchanges);
    assert_eq!(report.total_inflow_cost, MAX_AMOUNT * Decimal::from(1_000));
    assert_eq!(report.total_gain_loss, -report.total_inflow_cost);
    assert_eq!(report.verify_totals(), Ok(()));
}
