mod error;
mod matchmaker;
pub mod network;
mod room;
mod room_directory;
mod session_state;

pub use error::SessionError;
pub use matchmaker::{MatchOutcome, Matchmaker};
pub use network::{
    ClientEvent, ClientId, ConnectionRegistry, NetworkError, Outbound, Outbox, ServerEvent,
};
pub use room::{Room, RoomId, TeardownReason, ROOM_ID_SEPARATOR};
pub use room_directory::RoomDirectory;
pub use session_state::SessionState;
