use crate::model::{
    ClientId, Outbound, Outbox, Room, RoomId, ServerEvent, SessionError, TeardownReason,
};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Live rooms, plus a reverse index from each participant to its room.
///
/// A connection is in at most one room. Both maps are always updated
/// together, so a room id present here always has both participants indexed.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomId, Room>,
    rooms_by_client: HashMap<ClientId, RoomId>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn room_of(&self, client_id: ClientId) -> Option<&RoomId> {
        self.rooms_by_client.get(&client_id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Pairs `first` and `second` into a new room and joins both to its
    /// transport group.
    #[instrument(skip(self, outbox))]
    pub fn create_room(
        &mut self,
        first: ClientId,
        second: ClientId,
        outbox: &mut Outbox,
    ) -> Result<RoomId, SessionError> {
        let room = Room::new(first, second);
        let room_id = room.id().clone();

        if first == second
            || self.rooms.contains_key(&room_id)
            || self.rooms_by_client.contains_key(&first)
            || self.rooms_by_client.contains_key(&second)
        {
            debug!(%room_id, "Refusing to create conflicting room");
            return Err(SessionError::RoomConflict(room_id));
        }

        self.rooms_by_client.insert(first, room_id.clone());
        self.rooms_by_client.insert(second, room_id.clone());
        self.rooms.insert(room_id.clone(), room);

        for client_id in [first, second] {
            outbox.push(Outbound::JoinGroup {
                client_id,
                room_id: room_id.clone(),
            });
        }

        info!(%room_id, "Room created");
        Ok(room_id)
    }

    /// Forwards `msg` to the other participant of `room_id`.
    #[instrument(skip(self, msg, outbox))]
    pub fn relay(
        &self,
        room_id: &RoomId,
        from: ClientId,
        msg: String,
        outbox: &mut Outbox,
    ) -> Result<(), SessionError> {
        let room = self
            .rooms
            .get(room_id)
            .ok_or_else(|| SessionError::StaleRoomReference(room_id.clone()))?;

        if !room.contains(from) {
            return Err(SessionError::NotRoomMember {
                client_id: from,
                room_id: room_id.clone(),
            });
        }

        outbox.push(Outbound::Broadcast {
            room_id: room_id.clone(),
            event: ServerEvent::Message(msg),
            exclude: Some(from),
        });
        Ok(())
    }

    /// Removes `room_id`, notifies the participant other than `initiator`,
    /// and releases the transport group.
    ///
    /// Returns the notified participant. Tearing down a room that is already
    /// gone, or one `initiator` does not belong to, does nothing.
    #[instrument(skip(self, outbox))]
    pub fn teardown(
        &mut self,
        room_id: &RoomId,
        initiator: ClientId,
        reason: TeardownReason,
        outbox: &mut Outbox,
    ) -> Option<ClientId> {
        let partner = self.rooms.get(room_id)?.partner_of(initiator)?;
        let room = self.rooms.remove(room_id)?;

        for client_id in room.participants() {
            self.rooms_by_client.remove(&client_id);
        }

        outbox.push(Outbound::Emit {
            to: partner,
            event: ServerEvent::PartnerDisconnected(reason.message().to_string()),
        });
        for client_id in room.participants() {
            outbox.push(Outbound::LeaveGroup {
                client_id,
                room_id: room_id.clone(),
            });
        }

        info!(%room_id, %reason, %partner, "Room torn down");
        Some(partner)
    }

    /// Tears down whichever room `client_id` is in, if any.
    pub fn teardown_by_connection(
        &mut self,
        client_id: ClientId,
        reason: TeardownReason,
        outbox: &mut Outbox,
    ) -> Option<RoomId> {
        let room_id = self.rooms_by_client.get(&client_id)?.clone();
        self.teardown(&room_id, client_id, reason, outbox)?;
        Some(room_id)
    }
}
