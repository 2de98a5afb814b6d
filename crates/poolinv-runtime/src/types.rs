use poolinv_core::{MissingVdevPolicy, MAX_PROPERTY_LEN};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Listing behaviour of a management session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// What to do with a pool whose configuration has no vdev tree
    pub missing_vdev_policy: MissingVdevPolicy,
    /// Upper bound for the health string, in bytes
    pub health_max_len: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            missing_vdev_policy: MissingVdevPolicy::Abort,
            health_max_len: MAX_PROPERTY_LEN,
        }
    }
}

impl InventoryConfig {
    pub fn with_missing_vdev_policy(mut self, policy: MissingVdevPolicy) -> Self {
        self.missing_vdev_policy = policy;
        self
    }
}

/// Where the `zpool` backend finds its tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZpoolCommandConfig {
    /// `zpool` executable, looked up in `PATH` unless absolute
    pub zpool_bin: String,
    /// ZFS control device opened for the lifetime of a connection
    pub device: PathBuf,
}

impl Default for ZpoolCommandConfig {
    fn default() -> Self {
        Self {
            zpool_bin: "zpool".to_string(),
            device: PathBuf::from("/dev/zfs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InventoryConfig::default();
        assert_eq!(config.missing_vdev_policy, MissingVdevPolicy::Abort);
        assert_eq!(config.health_max_len, 1024);

        let zpool = ZpoolCommandConfig::default();
        assert_eq!(zpool.zpool_bin, "zpool");
        assert_eq!(zpool.device, PathBuf::from("/dev/zfs"));
    }
}
