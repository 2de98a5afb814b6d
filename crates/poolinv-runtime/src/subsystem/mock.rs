use crate::error::{Result, RuntimeError};
use crate::subsystem::{
    truncate_property, IterControl, PoolConfig, PoolConnection, PoolHandle, PoolSubsystem,
    VdevNode,
};
use parking_lot::RwLock;
use poolinv_core::PoolProperty;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A pool held by [`MockSubsystem`]
///
/// Properties that were never set (or were removed) fail their query, which
/// is how tests simulate per-field failures.
#[derive(Debug, Clone)]
pub struct MockPool {
    name: String,
    vdev_tree: Option<VdevNode>,
    int_properties: HashMap<PoolProperty, u64>,
    string_properties: HashMap<PoolProperty, String>,
}

impl MockPool {
    /// A pool with a single-disk vdev tree and no readable properties
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let tree = VdevNode::with_children(
            name.clone(),
            vec![VdevNode::new(format!("/dev/dsk/{}0", name))],
        );
        Self {
            name,
            vdev_tree: Some(tree),
            int_properties: HashMap::new(),
            string_properties: HashMap::new(),
        }
    }

    /// An ONLINE pool with every property populated
    pub fn healthy(name: impl Into<String>, size: u64, allocated: u64) -> Self {
        let free = size.saturating_sub(allocated);
        let capacity = if size == 0 { 0 } else { allocated * 100 / size };
        Self::new(name)
            .with_property(PoolProperty::Version, 5000)
            .with_property(PoolProperty::Size, size)
            .with_property(PoolProperty::Allocated, allocated)
            .with_property(PoolProperty::Free, free)
            .with_property(PoolProperty::Capacity, capacity)
            .with_dedup_ratio(1.0)
            .with_property(PoolProperty::DedupDitto, 0)
            .with_health("ONLINE")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_property(mut self, property: PoolProperty, value: u64) -> Self {
        self.int_properties.insert(property, value);
        self
    }

    /// Dedup ratio as a factor; stored in hundredths like the native library
    pub fn with_dedup_ratio(self, ratio: f64) -> Self {
        self.with_property(PoolProperty::DedupRatio, (ratio * 100.0).round() as u64)
    }

    pub fn with_health(mut self, health: impl Into<String>) -> Self {
        self.string_properties
            .insert(PoolProperty::Health, health.into());
        self
    }

    /// Make the query for `property` fail
    pub fn without_property(mut self, property: PoolProperty) -> Self {
        self.int_properties.remove(&property);
        self.string_properties.remove(&property);
        self
    }

    pub fn with_vdev_tree(mut self, tree: VdevNode) -> Self {
        self.vdev_tree = Some(tree);
        self
    }

    pub fn without_vdev_tree(mut self) -> Self {
        self.vdev_tree = None;
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    pools: Vec<MockPool>,
    open_error: Option<String>,
    iteration_error: Option<String>,
    opened: usize,
    closed: usize,
}

/// In-memory pool subsystem for tests and for running without ZFS
///
/// Clones share state, so a test can keep one handle to inject failures
/// and read the open/close counters while a session owns another.
#[derive(Debug, Clone, Default)]
pub struct MockSubsystem {
    state: Arc<RwLock<MockState>>,
}

impl MockSubsystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pools(pools: Vec<MockPool>) -> Self {
        let subsystem = Self::new();
        subsystem.state.write().pools = pools;
        subsystem
    }

    /// A small fixed set of pools for demos
    pub fn demo() -> Self {
        Self::with_pools(vec![
            MockPool::healthy("rpool", 256 * 1024 * 1024 * 1024, 41 * 1024 * 1024 * 1024),
            MockPool::healthy("tank", 8 * 1024 * 1024 * 1024 * 1024, 5 * 1024 * 1024 * 1024 * 1024)
                .with_dedup_ratio(1.37)
                .with_health("DEGRADED"),
        ])
    }

    pub fn add_pool(&self, pool: MockPool) {
        self.state.write().pools.push(pool);
    }

    /// Make every following `open` fail with `message`
    pub fn fail_open(&self, message: impl Into<String>) {
        self.state.write().open_error = Some(message.into());
    }

    /// Make every following iteration fail with `message`
    pub fn fail_iteration(&self, message: impl Into<String>) {
        self.state.write().iteration_error = Some(message.into());
    }

    pub fn opened_connections(&self) -> usize {
        self.state.read().opened
    }

    pub fn closed_connections(&self) -> usize {
        self.state.read().closed
    }

    fn with_pool<T>(&self, pool: PoolHandle, f: impl FnOnce(&MockPool) -> T) -> Option<T> {
        self.state.read().pools.get(pool.index()).map(f)
    }
}

impl PoolSubsystem for MockSubsystem {
    fn open(&self) -> std::io::Result<Box<dyn PoolConnection>> {
        let mut state = self.state.write();
        if let Some(ref message) = state.open_error {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                message.clone(),
            ));
        }
        state.opened += 1;
        debug!("Mock: opened connection #{}", state.opened);
        Ok(Box::new(MockConnection {
            subsystem: self.clone(),
            open: true,
        }))
    }
}

struct MockConnection {
    subsystem: MockSubsystem,
    open: bool,
}

impl MockConnection {
    fn query_failed(&self, pool: PoolHandle, property: PoolProperty) -> RuntimeError {
        let name = self
            .pool_name(pool)
            .unwrap_or_else(|| format!("#{}", pool.index()));
        RuntimeError::property_query_failed(name, property.as_str(), "property not available")
    }
}

impl PoolConnection for MockConnection {
    fn iterate_pools(&self, visit: &mut dyn FnMut(PoolHandle) -> IterControl) -> Result<()> {
        // Lock is released before visiting so the callback can query pools
        let count = {
            let state = self.subsystem.state.read();
            if !self.open {
                return Err(RuntimeError::iteration_failed("connection is closed"));
            }
            if let Some(ref message) = state.iteration_error {
                return Err(RuntimeError::iteration_failed(message.clone()));
            }
            state.pools.len()
        };

        for index in 0..count {
            if visit(PoolHandle::new(index)) == IterControl::Abort {
                debug!("Mock: iteration aborted at pool #{}", index);
                break;
            }
        }
        Ok(())
    }

    fn pool_name(&self, pool: PoolHandle) -> Option<String> {
        self.subsystem.with_pool(pool, |p| p.name.clone())
    }

    fn pool_config(&self, pool: PoolHandle) -> Option<PoolConfig> {
        self.subsystem
            .with_pool(pool, |p| PoolConfig::new(&p.name, p.vdev_tree.clone()))
    }

    fn int_property(&self, pool: PoolHandle, property: PoolProperty) -> Result<u64> {
        self.subsystem
            .with_pool(pool, |p| p.int_properties.get(&property).copied())
            .flatten()
            .ok_or_else(|| self.query_failed(pool, property))
    }

    fn string_property(
        &self,
        pool: PoolHandle,
        property: PoolProperty,
        max_len: usize,
    ) -> Result<String> {
        self.subsystem
            .with_pool(pool, |p| p.string_properties.get(&property).cloned())
            .flatten()
            .map(|value| truncate_property(value, max_len))
            .ok_or_else(|| self.query_failed(pool, property))
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            let mut state = self.subsystem.state.write();
            state.closed += 1;
            debug!("Mock: closed connection ({} closed so far)", state.closed);
        }
    }
}
