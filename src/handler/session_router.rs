use crate::model::{
    ClientEvent, ClientId, ConnectionRegistry, MatchOutcome, Matchmaker, Outbox, Room,
    RoomDirectory, RoomId, SessionError, SessionState, TeardownReason,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

#[derive(Debug, Default)]
struct Pairing {
    matchmaker: Matchmaker,
    rooms: RoomDirectory,
}

/// Point-in-time view of the pairing tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterStats {
    pub waiting: Option<ClientId>,
    pub rooms: usize,
}

/// Applies inbound events to the waiting slot and room directory, then
/// delivers the resulting effects through the registry.
///
/// Both tables sit behind one lock and each event runs to completion while
/// holding it, so events are processed one at a time no matter how many
/// connection tasks feed the router. Effects are delivered before the lock is
/// released so the order peers observe matches the order state changed in.
pub struct SessionRouter {
    pairing: Mutex<Pairing>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl SessionRouter {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        SessionRouter {
            pairing: Mutex::new(Pairing::default()),
            registry,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Pairing>, SessionError> {
        self.pairing
            .lock()
            .map_err(|e| SessionError::Internal(e.to_string()))
    }

    #[instrument(skip(self, event), fields(event = event_name(&event)))]
    pub fn dispatch(&self, client_id: ClientId, event: ClientEvent) -> Result<(), SessionError> {
        let mut pairing = self.lock()?;
        let mut outbox = Outbox::new();

        let result = match event {
            ClientEvent::Join => self.join(&mut pairing, client_id, &mut outbox).map(|_| ()),
            ClientEvent::Message { room_id, msg } => {
                pairing.rooms.relay(&room_id, client_id, msg, &mut outbox)
            }
            ClientEvent::LeaveRoom { room_id } => {
                Self::leave(&mut pairing, client_id, &room_id, &mut outbox)
            }
        };

        outbox.deliver(self.registry.as_ref());
        result
    }

    fn join(
        &self,
        pairing: &mut Pairing,
        client_id: ClientId,
        outbox: &mut Outbox,
    ) -> Result<MatchOutcome, SessionError> {
        match SessionState::of(client_id, &pairing.matchmaker, &pairing.rooms) {
            SessionState::Waiting | SessionState::Paired(_) => {
                debug!("Join from a connection that is not idle");
                Err(SessionError::DuplicateJoinRequest(client_id))
            }
            SessionState::Idle => {
                if let Some(occupant) = pairing.matchmaker.waiting() {
                    if !self.registry.is_connected(occupant) {
                        info!(%occupant, "Discarding stale waiting connection");
                        pairing.matchmaker.cancel(occupant);
                    }
                }
                let Pairing { matchmaker, rooms } = pairing;
                matchmaker.request_match(client_id, rooms, outbox)
            }
        }
    }

    fn leave(
        pairing: &mut Pairing,
        client_id: ClientId,
        room_id: &RoomId,
        outbox: &mut Outbox,
    ) -> Result<(), SessionError> {
        pairing.matchmaker.cancel(client_id);

        if pairing
            .rooms
            .teardown(room_id, client_id, TeardownReason::Left, outbox)
            .is_some()
        {
            return Ok(());
        }
        if pairing.rooms.contains(room_id) {
            Err(SessionError::NotRoomMember {
                client_id,
                room_id: room_id.clone(),
            })
        } else {
            Err(SessionError::StaleRoomReference(room_id.clone()))
        }
    }

    /// Cleans up after a closed connection: frees the waiting slot if it held
    /// it and tears down its room, notifying the partner.
    ///
    /// Safe to call more than once; later calls find nothing to clean up.
    #[instrument(skip(self))]
    pub fn disconnect(&self, client_id: ClientId) -> Result<Option<RoomId>, SessionError> {
        let mut pairing = self.lock()?;
        let mut outbox = Outbox::new();

        pairing.matchmaker.cancel(client_id);
        let room_id = pairing.rooms.teardown_by_connection(
            client_id,
            TeardownReason::Disconnected,
            &mut outbox,
        );

        outbox.deliver(self.registry.as_ref());
        Ok(room_id)
    }

    pub fn state_of(&self, client_id: ClientId) -> Result<SessionState, SessionError> {
        let pairing = self.lock()?;
        Ok(SessionState::of(
            client_id,
            &pairing.matchmaker,
            &pairing.rooms,
        ))
    }

    pub fn room(&self, room_id: &RoomId) -> Result<Option<Room>, SessionError> {
        Ok(self.lock()?.rooms.get(room_id).cloned())
    }

    pub fn rooms(&self) -> Result<Vec<Room>, SessionError> {
        Ok(self.lock()?.rooms.rooms().cloned().collect())
    }

    pub fn stats(&self) -> Result<RouterStats, SessionError> {
        let pairing = self.lock()?;
        Ok(RouterStats {
            waiting: pairing.matchmaker.waiting(),
            rooms: pairing.rooms.len(),
        })
    }
}

fn event_name(event: &ClientEvent) -> &'static str {
    match event {
        ClientEvent::Join => "join",
        ClientEvent::Message { .. } => "message",
        ClientEvent::LeaveRoom { .. } => "leave_room",
    }
}
