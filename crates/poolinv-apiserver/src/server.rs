use crate::handlers::*;
use crate::AppState;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server configuration
#[derive(Clone)]
pub struct Config {
    /// Address to listen on
    pub listen_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 9140)),
        }
    }
}

/// API server
pub struct ApiServer {
    config: Config,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: Config, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Build the router
    fn build_router(&self) -> Router {
        Router::new()
            // Health checks
            .route("/healthz", get(healthz))
            .route("/livez", get(livez))
            .route("/readyz", get(readyz))
            // Pools
            .route("/api/v1/pools", get(list_pools))
            .route("/api/v1/pools/{name}", get(get_pool))
            .route("/api/v1/version", get(get_version))
            // Add tracing and state
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.build_router();

        info!("Starting API server on {}", self.config.listen_addr);

        let listener = TcpListener::bind(self.config.listen_addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Health check endpoint
async fn healthz() -> &'static str {
    "ok"
}

/// Liveness probe
async fn livez() -> &'static str {
    "ok"
}

/// Readiness probe, fails once the session has been closed
async fn readyz(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> (StatusCode, &'static str) {
    if state.is_ready() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "session closed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use poolinv_core::PoolProperty;
    use poolinv_runtime::{InventoryConfig, ManagementSession, MockPool, MockSubsystem};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let subsystem = MockSubsystem::with_pools(vec![
            MockPool::healthy("tank", 1_000_000_000, 400_000_000),
            MockPool::healthy("backup", 1_000_000_000, 400_000_000)
                .without_property(PoolProperty::Health),
        ]);
        let session = ManagementSession::open(&subsystem, InventoryConfig::default()).unwrap();
        Arc::new(AppState::new(session))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:9140");
    }

    #[tokio::test]
    async fn test_list_pools_endpoint() {
        let router = ApiServer::new(Config::default(), test_state()).build_router();

        let (status, body) = get_json(router, "/api/v1/pools").await;
        assert_eq!(status, StatusCode::OK);
        let pools = body["zpool-list"].as_array().unwrap();
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0]["name"], "tank");
        assert_eq!(pools[0]["health"], "ONLINE");
        assert_eq!(pools[0]["capacityPercent"], 40);
        assert!(pools[1].get("health").is_none());
        assert!(body.get("status").is_none());
    }

    #[tokio::test]
    async fn test_get_pool_endpoint() {
        let router = ApiServer::new(Config::default(), test_state()).build_router();

        let (status, body) = get_json(router.clone(), "/api/v1/pools/backup").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "backup");

        let (status, body) = get_json(router, "/api/v1/pools/rpool").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "Failure");
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_version_endpoint() {
        let router = ApiServer::new(Config::default(), test_state()).build_router();

        let (status, body) = get_json(router, "/api/v1/version").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], 0.1);
    }

    #[tokio::test]
    async fn test_closed_session_is_unavailable() {
        let state = test_state();
        state.session.lock().await.close();
        let router = ApiServer::new(Config::default(), state).build_router();

        let (status, _) = get_json(router.clone(), "/api/v1/pools").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let response = router
            .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_closed_session_pool_lookup_is_unavailable() {
        let state = test_state();
        state.session.lock().await.close();
        let router = ApiServer::new(Config::default(), state).build_router();

        let (status, body) = get_json(router, "/api/v1/pools/tank").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], 503);
    }

    #[tokio::test]
    async fn test_busy_session_does_not_stall_the_runtime() {
        let state = test_state();
        let router = ApiServer::new(Config::default(), state.clone()).build_router();
        // Stands in for a long listing holding the session
        let guard = state.session.clone().lock_owned().await;

        let readyz = tokio::time::timeout(
            Duration::from_millis(200),
            router
                .clone()
                .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap()),
        )
        .await
        .expect("readyz waited on the session lock")
        .unwrap();
        assert_eq!(readyz.status(), StatusCode::OK);

        let pools = tokio::time::timeout(
            Duration::from_millis(200),
            router.oneshot(
                Request::builder()
                    .uri("/api/v1/pools")
                    .body(Body::empty())
                    .unwrap(),
            ),
        )
        .await;
        assert!(pools.is_err());

        drop(guard);
    }
}
