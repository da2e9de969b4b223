use gains_core::{
    filter::{FilterOp, Filters, FindOptions, QueryError},
    models::{Record, Value},
    ports::{EXCHANGES, ExchangeRepository as _, RecordStore, WAREHOUSES, WarehouseRepository as _},
};
use serde_json::json;
use std::sync::Mutex;

/// A store that replays canned rows and remembers every query it was asked.
#[derive(Default)]
struct ScriptedStore {
    rows: Vec<Record>,
    queries: Mutex<Vec<(String, Filters)>>,
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct ScriptedError(#[from] QueryError);

impl ScriptedStore {
    fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .filter_map(|row| match row {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect(),
            ..Default::default()
        }
    }

    // Naive in-memory evaluation, equality only, which is all the repositories use.
    fn matching(&self, filters: &Filters) -> Vec<Record> {
        self.rows
            .iter()
            .filter(|row| {
                filters.iter().all(|filter| {
                    assert_eq!(filter.op(), FilterOp::Eq);
                    row.get(filter.field()) == Some(filter.value())
                })
            })
            .cloned()
            .collect()
    }
}

impl RecordStore for ScriptedStore {
    type Error = ScriptedError;

    async fn find(
        &self,
        collection: &str,
        filters: &Filters,
        _options: &FindOptions,
    ) -> Result<Vec<Record>, Self::Error> {
        self.queries
            .lock()
            .unwrap()
            .push((collection.to_owned(), filters.clone()));
        Ok(self.matching(filters))
    }

    async fn count(&self, collection: &str, filters: &Filters) -> Result<u64, Self::Error> {
        self.queries
            .lock()
            .unwrap()
            .push((collection.to_owned(), filters.clone()));
        Ok(self.matching(filters).len() as u64)
    }
}

fn exchange(id: &str, from: &str, to: &str, standard: &str) -> Value {
    json!({
        "exchange_id": id,
        "from_warehouse": from,
        "to_warehouse": to,
        "commodity_standard": standard,
    })
}

#[tokio::test]
async fn fetches_inflows_then_outflows() {
    let store = ScriptedStore::with_rows(vec![
        exchange("EX_OUT", "WH_A", "WH_B", "bulk"),
        exchange("EX_IN", "WH_C", "WH_A", "bulk"),
        exchange("EX_OTHER", "WH_B", "WH_C", "bulk"),
        exchange("EX_SERIAL", "WH_C", "WH_A", "serialized"),
    ]);

    let records = store.fetch_warehouse_exchanges("WH_A").await.unwrap();
    let ids: Vec<_> = records
        .iter()
        .map(|record| record["exchange_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["EX_IN", "EX_OUT"]);

    let queries = store.queries.lock().unwrap();
    assert_eq!(queries.len(), 2);
    assert!(queries.iter().all(|(collection, _)| collection == EXCHANGES));
    assert_eq!(
        queries[0].1,
        Filters::parse([
            ("to_warehouse", json!("WH_A")),
            ("commodity_standard", json!("bulk")),
        ])
        .unwrap()
    );
    assert_eq!(queries[1].1.iter().next().unwrap().field(), "from_warehouse");
}

#[tokio::test]
async fn no_activity_is_an_empty_list() {
    let store = ScriptedStore::with_rows(vec![exchange("EX_1", "WH_B", "WH_C", "bulk")]);
    assert!(store.fetch_warehouse_exchanges("WH_A").await.unwrap().is_empty());
}

#[tokio::test]
async fn checks_warehouse_directory() {
    let store = ScriptedStore::with_rows(vec![json!({ "warehouse_id": "WH_A" })]);

    assert!(store.warehouse_exists("WH_A").await.unwrap());
    assert!(!store.warehouse_exists("WH_Z").await.unwrap());

    let queries = store.queries.lock().unwrap();
    assert!(queries.iter().all(|(collection, _)| collection == WAREHOUSES));
}
