mod exchange;
mod record_store;
mod warehouse;

pub use exchange::{EXCHANGES, ExchangeRepository};
pub use record_store::RecordStore;
pub use warehouse::{WAREHOUSES, WarehouseRepository};
