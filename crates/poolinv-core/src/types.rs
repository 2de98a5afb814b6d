use crate::error::PoolinvError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Informational version of the inventory interface
pub const INTERFACE_VERSION: f64 = 0.1;

/// Largest property string the native library will hand back
pub const MAX_PROPERTY_LEN: usize = 1024;

/// Pool-level properties read into a [`PoolRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolProperty {
    Version,
    Size,
    DedupRatio,
    DedupDitto,
    Allocated,
    Free,
    Capacity,
    Health,
}

impl PoolProperty {
    /// Properties queried as integers, in extraction order
    pub const NUMERIC: [PoolProperty; 7] = [
        PoolProperty::Version,
        PoolProperty::Size,
        PoolProperty::DedupRatio,
        PoolProperty::DedupDitto,
        PoolProperty::Allocated,
        PoolProperty::Free,
        PoolProperty::Capacity,
    ];

    /// Native property name as understood by `zpool get`
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolProperty::Version => "version",
            PoolProperty::Size => "size",
            PoolProperty::DedupRatio => "dedupratio",
            PoolProperty::DedupDitto => "dedupditto",
            PoolProperty::Allocated => "allocated",
            PoolProperty::Free => "free",
            PoolProperty::Capacity => "capacity",
            PoolProperty::Health => "health",
        }
    }

    /// Parse a native property name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "version" => Some(PoolProperty::Version),
            "size" => Some(PoolProperty::Size),
            "dedupratio" => Some(PoolProperty::DedupRatio),
            "dedupditto" => Some(PoolProperty::DedupDitto),
            "allocated" => Some(PoolProperty::Allocated),
            "free" => Some(PoolProperty::Free),
            "capacity" => Some(PoolProperty::Capacity),
            "health" => Some(PoolProperty::Health),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, PoolProperty::Health)
    }
}

impl fmt::Display for PoolProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PoolProperty {
    type Err = PoolinvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| PoolinvError::unknown_property(s))
    }
}

/// What the walker does with a pool whose configuration has no vdev tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingVdevPolicy {
    /// Stop the whole walk; pools already visited are kept
    #[default]
    Abort,
    /// Leave out just the offending pool and keep walking
    Skip,
}

impl MissingVdevPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingVdevPolicy::Abort => "abort",
            MissingVdevPolicy::Skip => "skip",
        }
    }
}

impl fmt::Display for MissingVdevPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MissingVdevPolicy {
    type Err = PoolinvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(MissingVdevPolicy::Abort),
            "skip" => Ok(MissingVdevPolicy::Skip),
            _ => Err(PoolinvError::invalid_policy(s)),
        }
    }
}

/// Health and capacity snapshot of one pool
///
/// Numeric fields are zero when the underlying property query failed.
/// `health` is left out entirely in that case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    pub name: String,
    /// On-disk format version
    pub version: u64,
    /// Total capacity in bytes
    pub size: u64,
    pub dedup_ratio: f64,
    pub dedup_ditto_threshold: u64,
    /// Bytes allocated
    pub allocated: u64,
    /// Bytes free
    pub free: u64,
    /// Percent of capacity in use
    pub capacity_percent: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
}

impl PoolRecord {
    /// A record with every numeric field zeroed and no health
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// How a listing ended
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum InventoryStatus {
    /// Every pool reported by the subsystem was visited
    #[default]
    Complete,
    /// The walk stopped at a pool without a vdev tree, or whose configuration
    /// or name could not be read
    Aborted { pool: String },
    /// The iteration primitive itself reported failure
    IterationFailed { message: String },
}

impl InventoryStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, InventoryStatus::Complete)
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryStatus::Complete => write!(f, "complete"),
            InventoryStatus::Aborted { pool } => {
                write!(f, "aborted at pool '{}' (no usable vdev tree)", pool)
            }
            InventoryStatus::IterationFailed { message } => {
                write!(f, "pool iteration failed: {}", message)
            }
        }
    }
}

/// Result envelope of one listing
///
/// Records keep the order the subsystem reported the pools in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(rename = "zpool-list", default)]
    pub pools: Vec<PoolRecord>,
    #[serde(default, skip_serializing_if = "InventoryStatus::is_complete")]
    pub status: InventoryStatus,
}

impl Inventory {
    pub fn new(pools: Vec<PoolRecord>, status: InventoryStatus) -> Self {
        Self { pools, status }
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PoolRecord> {
        self.pools.iter()
    }

    /// Look up a record by pool name
    pub fn get(&self, name: &str) -> Option<&PoolRecord> {
        self.pools.iter().find(|p| p.name == name)
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a PoolRecord;
    type IntoIter = std::slice::Iter<'a, PoolRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.pools.iter()
    }
}
