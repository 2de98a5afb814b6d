//! Poolinv Core - Data model for storage pool inventories
//!
//! This crate provides:
//! - Pool records and the inventory envelope
//! - Pool property names and the missing-vdev policy
//! - Error types with miette diagnostics
//! - Serialization helpers

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{PoolinvError, Result};
pub use types::{
    Inventory, InventoryStatus, MissingVdevPolicy, PoolProperty, PoolRecord, INTERFACE_VERSION,
    MAX_PROPERTY_LEN,
};

/// Informational version of the inventory interface
pub fn version() -> f64 {
    INTERFACE_VERSION
}

/// Serialize a value to JSON
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        PoolinvError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a value to pretty JSON
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        PoolinvError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a value from JSON
pub fn from_json<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_json::from_str(data).map_err(|e| {
        PoolinvError::serialization_error(
            format!("Failed to deserialize from JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a value to YAML
pub fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| {
        PoolinvError::serialization_error(
            format!("Failed to serialize to YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}
