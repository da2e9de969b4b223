use super::RecordStore;
use crate::filter::{Filters, FindOptions};
use crate::models::{CommodityStandard, Record};
use std::future::Future;

/// The collection holding the exchange ledger
pub const EXCHANGES: &str = "exchanges";

/// Access to the exchanges touching a warehouse.
///
/// Implemented for every [`RecordStore`].
pub trait ExchangeRepository: RecordStore {
    /// Fetch every bulk exchange into or out of `warehouse_id`.
    ///
    /// Runs one query for the inflows (the warehouse is the destination) and
    /// one for the outflows (the warehouse is the source), and returns the
    /// inflows followed by the outflows. A record cannot be both, so no
    /// deduplication is done.
    ///
    /// An empty `Vec` means the warehouse has no activity. Whether the
    /// warehouse exists at all is a separate question; see
    /// [`super::WarehouseRepository`].
    fn fetch_warehouse_exchanges(
        &self,
        warehouse_id: &str,
    ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send {
        async move {
            let standard = CommodityStandard::Bulk.as_str();
            let inflows = Filters::new()
                .equal("to_warehouse", warehouse_id)?
                .equal("commodity_standard", standard)?;
            let outflows = Filters::new()
                .equal("from_warehouse", warehouse_id)?
                .equal("commodity_standard", standard)?;

            let options = FindOptions::default();
            let mut records = self.find(EXCHANGES, &inflows, &options).await?;
            records.extend(self.find(EXCHANGES, &outflows, &options).await?);
            Ok(records)
        }
    }
}

impl<T: RecordStore> ExchangeRepository for T {}
