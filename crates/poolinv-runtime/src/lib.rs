//! Poolinv Runtime - Pool discovery and property extraction
//!
//! This crate provides:
//! - Traits over the native pool management subsystem
//! - `zpool`-utility and in-memory subsystem backends
//! - The management session and the listing pipeline
//!   (walker, property extractor, inventory assembler)

// Allow unused assignments for diagnostic fields - they're used by the thiserror/miette macros
#![allow(unused_assignments)]

pub mod assembler;
pub mod command;
pub mod error;
pub mod extractor;
pub mod listing;
pub mod session;
pub mod subsystem;
pub mod types;
pub mod walker;
pub mod zpool;

// Re-export primary types
pub use error::{Result, RuntimeError};
pub use listing::list_pools;
pub use session::ManagementSession;
pub use types::{InventoryConfig, ZpoolCommandConfig};
pub use walker::{PoolSummary, Walk};

// Re-export subsystem types
pub use subsystem::{
    IterControl, MockPool, MockSubsystem, PoolConfig, PoolConnection, PoolHandle, PoolSubsystem,
    VdevNode, ZpoolCommandSubsystem,
};
