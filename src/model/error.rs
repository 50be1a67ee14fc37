use crate::model::{ClientId, RoomId};
use thiserror::Error;

/// Conditions the session core detects while handling an event.
///
/// None of these reach the client. The transport logs them and moves on; the
/// peer simply never sees the response it was expecting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Room no longer exists: {0}")]
    StaleRoomReference(RoomId),

    #[error("Connection is already waiting or paired: {0}")]
    DuplicateJoinRequest(ClientId),

    #[error("Connection {client_id} is not a participant of room {room_id}")]
    NotRoomMember { client_id: ClientId, room_id: RoomId },

    #[error("Room already exists: {0}")]
    RoomConflict(RoomId),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
