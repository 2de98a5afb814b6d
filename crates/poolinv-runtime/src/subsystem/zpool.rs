use crate::command::exec;
use crate::error::{Result, RuntimeError};
use crate::subsystem::{
    truncate_property, IterControl, PoolConfig, PoolConnection, PoolHandle, PoolSubsystem,
};
use crate::types::ZpoolCommandConfig;
use crate::zpool::{parse_int_property, parse_status_config};
use parking_lot::Mutex;
use poolinv_core::PoolProperty;
use std::fs::File;
use tracing::{debug, info};

/// ZFS subsystem driven through the `zpool` utility
///
/// Opening a connection opens the ZFS control device and keeps it open
/// until the connection is closed, so an unusable host is reported when
/// the session is created rather than on the first listing.
pub struct ZpoolCommandSubsystem {
    config: ZpoolCommandConfig,
}

impl ZpoolCommandSubsystem {
    pub fn new(config: ZpoolCommandConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ZpoolCommandConfig {
        &self.config
    }
}

impl Default for ZpoolCommandSubsystem {
    fn default() -> Self {
        Self::new(ZpoolCommandConfig::default())
    }
}

impl PoolSubsystem for ZpoolCommandSubsystem {
    fn open(&self) -> std::io::Result<Box<dyn PoolConnection>> {
        let device = File::open(&self.config.device)?;
        info!(
            "Opened ZFS control device {} (zpool: {})",
            self.config.device.display(),
            self.config.zpool_bin
        );
        Ok(Box::new(ZpoolConnection {
            zpool_bin: self.config.zpool_bin.clone(),
            device: Some(device),
            pools: Mutex::new(Vec::new()),
        }))
    }
}

struct ZpoolConnection {
    zpool_bin: String,
    device: Option<File>,
    /// Pool names from the last iteration; a handle indexes into this
    pools: Mutex<Vec<String>>,
}

impl ZpoolConnection {
    fn zpool(&self, args: &[&str]) -> Result<String> {
        exec(&self.zpool_bin, args).map(|output| output.stdout)
    }

    fn require_name(&self, pool: PoolHandle, property: PoolProperty) -> Result<String> {
        self.pool_name(pool).ok_or_else(|| {
            RuntimeError::property_query_failed(
                format!("#{}", pool.index()),
                property.as_str(),
                "unknown pool handle",
            )
        })
    }

    fn get_value(&self, name: &str, property: PoolProperty, parsable: bool) -> Result<String> {
        let flags = if parsable { "-Hp" } else { "-H" };
        self.zpool(&["get", flags, "-o", "value", property.as_str(), name])
            .map_err(|e| RuntimeError::property_query_failed(name, property.as_str(), e.detail()))
    }
}

impl PoolConnection for ZpoolConnection {
    fn iterate_pools(&self, visit: &mut dyn FnMut(PoolHandle) -> IterControl) -> Result<()> {
        if self.device.is_none() {
            return Err(RuntimeError::iteration_failed("connection is closed"));
        }

        let stdout = self
            .zpool(&["list", "-H", "-o", "name"])
            .map_err(|e| RuntimeError::iteration_failed(e.detail()))?;
        let names: Vec<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        let count = names.len();
        *self.pools.lock() = names;
        debug!("zpool reported {} pool(s)", count);

        for index in 0..count {
            if visit(PoolHandle::new(index)) == IterControl::Abort {
                break;
            }
        }
        Ok(())
    }

    fn pool_name(&self, pool: PoolHandle) -> Option<String> {
        self.pools.lock().get(pool.index()).cloned()
    }

    fn pool_config(&self, pool: PoolHandle) -> Option<PoolConfig> {
        let name = self.pool_name(pool)?;
        match self.zpool(&["status", "-P", &name]) {
            Ok(stdout) => {
                let tree = parse_status_config(&stdout, &name);
                Some(PoolConfig::new(name, tree))
            }
            Err(e) => {
                debug!("Could not read configuration of pool '{}': {}", name, e);
                None
            }
        }
    }

    fn int_property(&self, pool: PoolHandle, property: PoolProperty) -> Result<u64> {
        let name = self.require_name(pool, property)?;
        let raw = self.get_value(&name, property, true)?;
        parse_int_property(property, &raw).ok_or_else(|| {
            RuntimeError::property_query_failed(
                &name,
                property.as_str(),
                format!("unexpected value '{}'", raw.trim()),
            )
        })
    }

    fn string_property(
        &self,
        pool: PoolHandle,
        property: PoolProperty,
        max_len: usize,
    ) -> Result<String> {
        let name = self.require_name(pool, property)?;
        let raw = self.get_value(&name, property, false)?;
        let value = raw.trim();
        if value.is_empty() || value == "-" {
            return Err(RuntimeError::property_query_failed(
                &name,
                property.as_str(),
                "no value reported",
            ));
        }
        Ok(truncate_property(value.to_string(), max_len))
    }

    fn close(&mut self) {
        if self.device.take().is_some() {
            self.pools.lock().clear();
            debug!("Closed ZFS control device");
        }
    }
}
