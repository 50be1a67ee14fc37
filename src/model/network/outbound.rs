use super::{ClientId, ConnectionRegistry, ServerEvent};
use crate::model::RoomId;
use tracing::{trace, warn};

/// A transport side effect decided by the session core.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Emit {
        to: ClientId,
        event: ServerEvent,
    },
    JoinGroup {
        client_id: ClientId,
        room_id: RoomId,
    },
    LeaveGroup {
        client_id: ClientId,
        room_id: RoomId,
    },
    Broadcast {
        room_id: RoomId,
        event: ServerEvent,
        exclude: Option<ClientId>,
    },
}

/// Effects collected while state is mutated, delivered afterwards in order.
#[derive(Debug, Default)]
pub struct Outbox {
    items: Vec<Outbound>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outbound: Outbound) {
        self.items.push(outbound);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Outbound] {
        &self.items
    }

    /// Hands every effect to the registry. Delivery is best effort: a failure
    /// is logged and the remaining effects still go out.
    ///
    /// Returns the number of effects that failed.
    pub fn deliver(self, registry: &dyn ConnectionRegistry) -> usize {
        let mut failed = 0;
        for outbound in self.items {
            trace!(?outbound, "Delivering outbound effect");
            let result = match &outbound {
                Outbound::Emit { to, event } => registry.emit(*to, event),
                Outbound::JoinGroup { client_id, room_id } => {
                    registry.join_group(*client_id, room_id)
                }
                Outbound::LeaveGroup { client_id, room_id } => {
                    registry.leave_group(*client_id, room_id)
                }
                Outbound::Broadcast {
                    room_id,
                    event,
                    exclude,
                } => registry.broadcast_to_group(room_id, event, *exclude),
            };
            if let Err(e) = result {
                warn!(error = ?e, ?outbound, "Failed to deliver outbound effect");
                failed += 1;
            }
        }
        failed
    }
}
