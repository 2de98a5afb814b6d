// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for pool inventory values
#[derive(Error, Debug, Diagnostic)]
pub enum PoolinvError {
    /// Unknown pool property name
    #[error("Unknown pool property: {name}")]
    #[diagnostic(
        code(poolinv::unknown_property),
        help("Supported properties: version, size, dedupratio, dedupditto, allocated, free, capacity, health")
    )]
    UnknownProperty {
        #[allow(unused)]
        name: String,
    },

    /// Unknown missing-vdev policy
    #[error("Invalid missing-vdev policy: {value}")]
    #[diagnostic(
        code(poolinv::invalid_policy),
        help("Use 'abort' to stop the walk at the first pool without a vdev tree, or 'skip' to leave just that pool out")
    )]
    InvalidPolicy {
        #[allow(unused)]
        value: String,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(poolinv::serialization_error),
        help("Ensure the inventory document is valid JSON or YAML")
    )]
    SerializationError {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, PoolinvError>;

impl PoolinvError {
    /// Create an UnknownProperty error
    pub fn unknown_property(name: impl Into<String>) -> Self {
        Self::UnknownProperty { name: name.into() }
    }

    /// Create an InvalidPolicy error
    pub fn invalid_policy(value: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            value: value.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source,
        }
    }
}
