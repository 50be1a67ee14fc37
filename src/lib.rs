pub mod config;
pub mod handler;
pub mod model;

#[cfg(feature = "server")]
pub mod server;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::handler::{RouterStats, SessionRouter};
    pub use crate::model::ClientEvent;
    pub use crate::model::ClientId;
    pub use crate::model::ConnectionRegistry;
    pub use crate::model::MatchOutcome;
    pub use crate::model::Matchmaker;
    pub use crate::model::NetworkError;
    pub use crate::model::Room;
    pub use crate::model::RoomDirectory;
    pub use crate::model::RoomId;
    pub use crate::model::ServerEvent;
    pub use crate::model::SessionError;
    pub use crate::model::SessionState;
    pub use crate::model::TeardownReason;
}
