use crate::session::ManagementSession;
use crate::subsystem::{IterControl, PoolConnection, PoolHandle};
use poolinv_core::{InventoryStatus, MissingVdevPolicy};
use std::fmt;
use tracing::{debug, warn};

/// A pool that passed the configuration check, valid for one listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSummary {
    pub name: String,
    pub handle: PoolHandle,
}

/// Pools visited by one walk, in subsystem order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    pub pools: Vec<PoolSummary>,
    pub status: InventoryStatus,
}

impl Walk {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            pools: Vec::new(),
            status: InventoryStatus::IterationFailed {
                message: message.into(),
            },
        }
    }
}

/// Walk every pool visible through the session
pub fn walk(session: &ManagementSession) -> Walk {
    match session.connection() {
        Some(connection) => walk_connection(connection, session.config().missing_vdev_policy),
        None => {
            warn!("Pool walk requested on a closed session");
            Walk::failed("session is closed")
        }
    }
}

/// Walk the pools of `connection`
///
/// A pool is kept only if its configuration, its vdev tree and its name can
/// all be read; a pool failing any of these is handled like a pool without a
/// vdev tree. Under [`MissingVdevPolicy::Abort`] the first such pool ends the
/// walk; earlier pools are kept. If the iteration primitive itself fails,
/// nothing is kept.
pub fn walk_connection(connection: &dyn PoolConnection, policy: MissingVdevPolicy) -> Walk {
    let mut pools = Vec::new();
    let mut aborted_at = None;

    let result = connection.iterate_pools(&mut |handle| {
        let rejected = match usable_pool(connection, handle) {
            Ok(summary) => {
                debug!("Visited pool '{}'", summary.name);
                pools.push(summary);
                return IterControl::Continue;
            }
            Err(rejected) => rejected,
        };

        let name = rejected.pool_label(connection, handle);
        match policy {
            MissingVdevPolicy::Abort => {
                warn!("Pool '{}' {}, aborting pool walk", name, rejected);
                aborted_at = Some(name);
                IterControl::Abort
            }
            MissingVdevPolicy::Skip => {
                warn!("Pool '{}' {}, skipping it", name, rejected);
                IterControl::Continue
            }
        }
    });

    if let Err(e) = result {
        warn!("Pool iteration failed: {}", e);
        return Walk::failed(e.detail());
    }

    let status = match aborted_at {
        Some(pool) => InventoryStatus::Aborted { pool },
        None => InventoryStatus::Complete,
    };
    Walk { pools, status }
}

/// Why a visited pool was not kept
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rejected {
    NoConfig,
    NoVdevTree { name: String },
    UnknownName,
}

impl Rejected {
    fn pool_label(&self, connection: &dyn PoolConnection, handle: PoolHandle) -> String {
        match self {
            Rejected::NoVdevTree { name } => name.clone(),
            _ => connection
                .pool_name(handle)
                .unwrap_or_else(|| format!("#{}", handle.index())),
        }
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::NoConfig => write!(f, "has no readable configuration"),
            Rejected::NoVdevTree { .. } => write!(f, "has no vdev tree"),
            Rejected::UnknownName => write!(f, "has no readable name"),
        }
    }
}

fn usable_pool(
    connection: &dyn PoolConnection,
    handle: PoolHandle,
) -> Result<PoolSummary, Rejected> {
    let config = connection.pool_config(handle).ok_or(Rejected::NoConfig)?;
    if config.vdev_tree().is_none() {
        return Err(Rejected::NoVdevTree {
            name: config.pool_name.clone(),
        });
    }
    let name = connection.pool_name(handle).ok_or(Rejected::UnknownName)?;
    Ok(PoolSummary { name, handle })
}
