use crate::assembler::assemble;
use crate::extractor::PropertyExtractor;
use crate::session::ManagementSession;
use crate::walker::walk;
use poolinv_core::Inventory;
use tracing::info;

/// List every pool visible through `session`
///
/// Runs the walk and all property queries to completion on the calling
/// thread. Never fails: per-pool and per-property problems degrade the
/// result and are reported through [`Inventory::status`].
pub fn list_pools(session: &ManagementSession) -> Inventory {
    let walk = walk(session);

    let records = match session.connection() {
        Some(connection) => {
            let extractor = PropertyExtractor::new(connection, session.config().health_max_len);
            walk.pools.iter().map(|pool| extractor.extract(pool)).collect()
        }
        None => Vec::new(),
    };

    let inventory = assemble(records, walk.status);
    info!(
        "Listed {} pool(s) ({})",
        inventory.len(),
        inventory.status
    );
    inventory
}
