use crate::config::Config;
use crate::handler::SessionRouter;
use crate::server::ConnectionHub;
use std::sync::Arc;

/// Shared by every WebSocket handler for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub hub: Arc<ConnectionHub>,
    pub router: Arc<SessionRouter>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let hub = Arc::new(ConnectionHub::new());
        let router = Arc::new(SessionRouter::new(hub.clone()));
        AppState {
            config: Arc::new(config),
            hub,
            router,
        }
    }
}
