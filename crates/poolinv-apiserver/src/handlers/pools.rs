use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::{AppState, Result};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use poolinv_core::Inventory;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Version document
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: f64,
    #[serde(rename = "buildVersion")]
    pub build_version: &'static str,
}

/// Run one listing on the blocking pool while holding the session lock
///
/// The open check and the listing share one lock acquisition.
async fn take_inventory(state: &AppState) -> Result<Inventory> {
    let session = state.session.clone();
    let inventory = tokio::task::spawn_blocking(move || {
        let session = session.blocking_lock();
        session.is_open().then(|| session.list_pools())
    })
    .await?;
    inventory.ok_or_else(|| ApiError::Unavailable("Management session is closed".to_string()))
}

/// GET /api/v1/pools
pub async fn list_pools(State(state): State<Arc<AppState>>) -> Result<Response> {
    let inventory = take_inventory(&state).await?;
    debug!("Serving inventory of {} pool(s)", inventory.len());
    Ok(ApiResponse::ok(inventory).into_response())
}

/// GET /api/v1/pools/{name}
pub async fn get_pool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response> {
    let inventory = take_inventory(&state).await?;
    let record = inventory
        .pools
        .into_iter()
        .find(|p| p.name == name)
        .ok_or_else(|| ApiError::NotFound(format!("Pool not found: {}", name)))?;
    Ok(ApiResponse::ok(record).into_response())
}

/// GET /api/v1/version
pub async fn get_version() -> Response {
    ApiResponse::ok(VersionResponse {
        version: poolinv_core::version(),
        build_version: env!("CARGO_PKG_VERSION"),
    })
    .into_response()
}
