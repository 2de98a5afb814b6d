use poolinv_core::{Inventory, InventoryStatus, PoolRecord};

/// Fold records into the inventory envelope, keeping their order
pub fn assemble(
    records: impl IntoIterator<Item = PoolRecord>,
    status: InventoryStatus,
) -> Inventory {
    Inventory::new(records.into_iter().collect(), status)
}
