//! Poolinv API Server - HTTP access to pool inventories
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Pool listing and single-pool endpoints
//! - Health and readiness probes

pub mod error;
pub mod handlers;
pub mod response;
pub mod server;
pub mod state;

// Re-export commonly used types
pub use error::{ApiError, Result};
pub use server::{ApiServer, Config};
pub use state::AppState;
