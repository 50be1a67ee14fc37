mod connection;
mod connection_hub;
pub mod route;
mod state;
pub mod telemetry;
pub mod websocket_listener;

pub use connection::Connection;
pub use connection_hub::ConnectionHub;
pub use route::create_chat_route;
pub use state::AppState;
