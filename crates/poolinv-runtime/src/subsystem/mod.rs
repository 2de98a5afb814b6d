mod mock;
mod zpool;

pub use mock::{MockPool, MockSubsystem};
pub use zpool::ZpoolCommandSubsystem;

use crate::error::Result;
use poolinv_core::PoolProperty;

/// Key of the vdev tree inside a pool configuration
pub const VDEV_TREE_KEY: &str = "vdev_tree";

/// Opaque reference to one pool, valid only while the connection that
/// produced it is open and only for the current listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle(usize);

impl PoolHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Returned by the per-pool callback to steer iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterControl {
    Continue,
    Abort,
}

/// One node of a pool's virtual device tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VdevNode {
    pub name: String,
    pub children: Vec<VdevNode>,
}

impl VdevNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<VdevNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaf devices below (or at) this node
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(VdevNode::leaf_count).sum()
        }
    }
}

/// Configuration object of a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub pool_name: String,
    vdev_tree: Option<VdevNode>,
}

impl PoolConfig {
    pub fn new(pool_name: impl Into<String>, vdev_tree: Option<VdevNode>) -> Self {
        Self {
            pool_name: pool_name.into(),
            vdev_tree,
        }
    }

    /// Look up a named sub-tree. Only the vdev tree is modelled.
    pub fn lookup(&self, key: &str) -> Option<&VdevNode> {
        match key {
            VDEV_TREE_KEY => self.vdev_tree.as_ref(),
            _ => None,
        }
    }

    pub fn vdev_tree(&self) -> Option<&VdevNode> {
        self.lookup(VDEV_TREE_KEY)
    }
}

/// Entry point to a native pool management subsystem
///
/// `ZpoolCommandSubsystem` talks to ZFS through the `zpool` utility.
/// `MockSubsystem` keeps pools in memory for tests and demos.
pub trait PoolSubsystem: Send + Sync {
    /// Open a connection. The error carries the system error text.
    fn open(&self) -> std::io::Result<Box<dyn PoolConnection>>;
}

/// An open connection to the subsystem
///
/// Every call blocks until the subsystem answers. A connection must not be
/// driven by two listings at once.
pub trait PoolConnection: Send {
    /// Call `visit` once per pool, in subsystem order, until it returns
    /// [`IterControl::Abort`]. An `Err` means the primitive itself failed.
    fn iterate_pools(&self, visit: &mut dyn FnMut(PoolHandle) -> IterControl) -> Result<()>;

    fn pool_name(&self, pool: PoolHandle) -> Option<String>;

    /// Configuration of the pool, `None` if it cannot be retrieved
    fn pool_config(&self, pool: PoolHandle) -> Option<PoolConfig>;

    fn int_property(&self, pool: PoolHandle, property: PoolProperty) -> Result<u64>;

    /// String property, at most `max_len` bytes long
    fn string_property(
        &self,
        pool: PoolHandle,
        property: PoolProperty,
        max_len: usize,
    ) -> Result<String>;

    /// Release the connection. Further calls are a no-op.
    fn close(&mut self);
}

/// Cut `value` down to at most `max_len` bytes without splitting a character
pub fn truncate_property(mut value: String, max_len: usize) -> String {
    if value.len() > max_len {
        let mut end = max_len;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        value.truncate(end);
    }
    value
}
