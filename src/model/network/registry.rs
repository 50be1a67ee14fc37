use super::{ClientId, NetworkError, ServerEvent};
use crate::model::RoomId;

/// The narrow slice of the transport the session core talks to.
///
/// Groups are keyed by room id. Every call is fire-and-forget from the core's
/// point of view; errors are reported so the caller can log them.
pub trait ConnectionRegistry: Send + Sync {
    fn emit(&self, client_id: ClientId, event: &ServerEvent) -> Result<(), NetworkError>;

    fn join_group(&self, client_id: ClientId, room_id: &RoomId) -> Result<(), NetworkError>;

    fn leave_group(&self, client_id: ClientId, room_id: &RoomId) -> Result<(), NetworkError>;

    fn broadcast_to_group(
        &self,
        room_id: &RoomId,
        event: &ServerEvent,
        exclude: Option<ClientId>,
    ) -> Result<(), NetworkError>;

    fn is_connected(&self, client_id: ClientId) -> bool;
}
