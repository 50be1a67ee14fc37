use crate::model::{ClientId, Outbound, Outbox, RoomDirectory, RoomId, ServerEvent, SessionError};
use tracing::{debug, info, instrument, warn};

/// What a join request led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The requester now holds the waiting slot.
    Waiting,
    /// The requester was paired with the previous occupant.
    Paired(RoomId),
}

/// Holds the single waiting slot.
#[derive(Debug, Default)]
pub struct Matchmaker {
    waiting: Option<ClientId>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waiting(&self) -> Option<ClientId> {
        self.waiting
    }

    pub fn is_waiting(&self, client_id: ClientId) -> bool {
        self.waiting == Some(client_id)
    }

    /// Queues `client_id`, or pairs it with whoever is already queued.
    ///
    /// A connection that is already queued or already in a room gets
    /// `DuplicateJoinRequest` and nothing changes.
    #[instrument(skip(self, rooms, outbox))]
    pub fn request_match(
        &mut self,
        client_id: ClientId,
        rooms: &mut RoomDirectory,
        outbox: &mut Outbox,
    ) -> Result<MatchOutcome, SessionError> {
        if self.is_waiting(client_id) || rooms.room_of(client_id).is_some() {
            debug!("Ignoring repeated join request");
            return Err(SessionError::DuplicateJoinRequest(client_id));
        }

        let Some(partner) = self.waiting.take() else {
            self.waiting = Some(client_id);
            outbox.push(Outbound::Emit {
                to: client_id,
                event: ServerEvent::Waiting,
            });
            info!("Connection is waiting for a partner");
            return Ok(MatchOutcome::Waiting);
        };

        match rooms.create_room(partner, client_id, outbox) {
            Ok(room_id) => {
                outbox.push(Outbound::Broadcast {
                    room_id: room_id.clone(),
                    event: ServerEvent::Matched(room_id.clone()),
                    exclude: None,
                });
                info!(%room_id, %partner, "Connections matched");
                Ok(MatchOutcome::Paired(room_id))
            }
            Err(e) => {
                warn!(error = ?e, %partner, "Could not pair, keeping partner queued");
                self.waiting = Some(partner);
                Err(e)
            }
        }
    }

    /// Empties the slot if `client_id` holds it. Returns whether it did.
    pub fn cancel(&mut self, client_id: ClientId) -> bool {
        if self.is_waiting(client_id) {
            self.waiting = None;
            debug!(%client_id, "Waiting slot cleared");
            true
        } else {
            false
        }
    }
}
