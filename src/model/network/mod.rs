mod client;
mod error;
mod event;
mod outbound;
mod registry;

pub use client::ClientId;
pub use error::NetworkError;
pub use event::{ClientEvent, ServerEvent};
pub use outbound::{Outbound, Outbox};
pub use registry::ConnectionRegistry;
