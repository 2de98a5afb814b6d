use crate::error::{Result, RuntimeError};
use crate::listing;
use crate::subsystem::{PoolConnection, PoolSubsystem};
use crate::types::InventoryConfig;
use poolinv_core::Inventory;
use tracing::{debug, info};

/// Live connection to a pool management subsystem
///
/// The connection is opened by [`ManagementSession::open`] and released
/// exactly once, either by [`ManagementSession::close`] or on drop.
///
/// A session is `Send` but listings take `&self` and are not synchronized:
/// share a session between threads only behind a mutex.
pub struct ManagementSession {
    connection: Option<Box<dyn PoolConnection>>,
    config: InventoryConfig,
}

impl ManagementSession {
    /// Open a session. Failure is fatal and is not retried.
    pub fn open(subsystem: &dyn PoolSubsystem, config: InventoryConfig) -> Result<Self> {
        let connection = subsystem
            .open()
            .map_err(|e| RuntimeError::subsystem_unavailable(e.to_string()))?;
        info!(
            "Management session opened (missing vdev policy: {})",
            config.missing_vdev_policy
        );
        Ok(Self {
            connection: Some(connection),
            config,
        })
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// The open connection, `None` once closed
    pub fn connection(&self) -> Option<&dyn PoolConnection> {
        self.connection.as_deref()
    }

    /// Enumerate all pools and read their properties
    pub fn list_pools(&self) -> Inventory {
        listing::list_pools(self)
    }

    /// Release the connection. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
            debug!("Management session closed");
        }
    }
}

impl Drop for ManagementSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ManagementSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementSession")
            .field("open", &self.is_open())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystem::MockSubsystem;

    #[test]
    fn test_open_failure_is_subsystem_unavailable() {
        let subsystem = MockSubsystem::new();
        subsystem.fail_open("No such file or directory");

        let err = ManagementSession::open(&subsystem, InventoryConfig::default()).unwrap_err();
        match err {
            RuntimeError::SubsystemUnavailable { message } => {
                assert_eq!(message, "No such file or directory");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(subsystem.closed_connections(), 0);
    }

    #[test]
    fn test_close_runs_once() {
        let subsystem = MockSubsystem::new();
        let mut session = ManagementSession::open(&subsystem, InventoryConfig::default()).unwrap();
        assert!(session.is_open());

        session.close();
        session.close();
        assert!(!session.is_open());
        drop(session);

        assert_eq!(subsystem.opened_connections(), 1);
        assert_eq!(subsystem.closed_connections(), 1);
    }

    #[test]
    fn test_drop_closes_connection() {
        let subsystem = MockSubsystem::new();
        {
            let _session =
                ManagementSession::open(&subsystem, InventoryConfig::default()).unwrap();
            assert_eq!(subsystem.closed_connections(), 0);
        }
        assert_eq!(subsystem.closed_connections(), 1);
    }

    #[test]
    fn test_session_outlives_listings() {
        let subsystem = MockSubsystem::new();
        let session = ManagementSession::open(&subsystem, InventoryConfig::default()).unwrap();

        session.list_pools();
        session.list_pools();
        assert!(session.is_open());
        assert_eq!(subsystem.closed_connections(), 0);
    }
}
