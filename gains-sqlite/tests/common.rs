use gains_core::models::Record;
use gains_sqlite::{Db, config::SqliteConfig};
use serde_json::{Value, json};

fn records(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// An in-memory store holding two warehouses and four exchanges.
pub async fn seeded() -> anyhow::Result<Db> {
    let db = Db::open(&SqliteConfig::default()).await?;

    db.insert_all(
        "warehouses",
        &records(json!([
            { "warehouse_id": "WH_A", "company_id": "C1", "country": "NL", "warehouse_type": "silo" },
            { "warehouse_id": "WH_B", "company_id": "C1", "country": "DE", "warehouse_type": "depot" },
        ])),
    )
    .await?;

    db.insert_all(
        "exchanges",
        &records(json!([
            {
                "exchange_id": "EX_1", "from_warehouse": "0x0000", "to_warehouse": "WH_A",
                "brand_manufacturer": "Cargill", "item_type": "Wheat", "commodity_standard": "bulk",
                "quantity": "100", "unit": "tons", "price_paid_usd": "20000.00",
                "timestamp": "2023-06-01T10:00:00Z", "batch_id": "B1", "item_ids": null
            },
            {
                "exchange_id": "EX_2", "from_warehouse": "WH_A", "to_warehouse": "WH_B",
                "brand_manufacturer": "Cargill", "item_type": "Wheat", "commodity_standard": "bulk",
                "quantity": "50", "unit": "tons", "price_paid_usd": "12000.00",
                "timestamp": "2023-06-10T10:00:00Z", "batch_id": null, "item_ids": null
            },
            {
                "exchange_id": "EX_3", "from_warehouse": "0x0000", "to_warehouse": "WH_B",
                "brand_manufacturer": "Tata", "item_type": "Steel", "commodity_standard": "bulk",
                "quantity": "10", "unit": "tons", "price_paid_usd": "25000.00",
                "timestamp": "2023-06-05T10:00:00Z", "batch_id": null, "item_ids": null
            },
            {
                "exchange_id": "EX_4", "from_warehouse": "WH_B", "to_warehouse": "WH_A",
                "brand_manufacturer": "Rolex", "item_type": "Watch", "commodity_standard": "serialized",
                "quantity": "1", "unit": "piece", "price_paid_usd": "9000.00",
                "timestamp": "2023-06-07T10:00:00Z", "batch_id": null, "item_ids": ["W-1"]
            },
        ])),
    )
    .await?;

    Ok(db)
}
