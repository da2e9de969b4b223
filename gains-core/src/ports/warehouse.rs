use super::RecordStore;
use crate::filter::Filters;
use std::future::Future;

/// The collection holding one record per known warehouse
pub const WAREHOUSES: &str = "warehouses";

/// Lookups against the warehouse directory.
///
/// Implemented for every [`RecordStore`].
pub trait WarehouseRepository: RecordStore {
    /// Returns whether a warehouse with this id is on record.
    fn warehouse_exists(
        &self,
        warehouse_id: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        async move {
            let filters = Filters::new().equal("warehouse_id", warehouse_id)?;
            Ok(self.count(WAREHOUSES, &filters).await? > 0)
        }
    }
}

impl<T: RecordStore> WarehouseRepository for T {}
