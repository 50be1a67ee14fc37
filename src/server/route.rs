use crate::server::{websocket_listener, AppState};
use axum::{routing::get, Router};
use tracing::{debug, instrument};

#[instrument(skip(state))]
pub fn create_chat_route(state: AppState) -> Router {
    debug!("Creating chat route");
    Router::new()
        .route("/chat", get(websocket_listener::handle_websocket))
        .with_state(state)
}
