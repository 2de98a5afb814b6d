use poolinv_runtime::ManagementSession;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The one management session; listings hold the lock for their whole run
    pub session: Arc<Mutex<ManagementSession>>,
}

impl AppState {
    pub fn new(session: ManagementSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Whether the session is open, without waiting on a running listing
    ///
    /// A listing holds the lock only on an open session, so a busy lock
    /// counts as ready.
    pub fn is_ready(&self) -> bool {
        match self.session.try_lock() {
            Ok(session) => session.is_open(),
            Err(_) => true,
        }
    }
}
