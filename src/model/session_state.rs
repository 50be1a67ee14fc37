use crate::model::{ClientId, Matchmaker, RoomDirectory, RoomId};

/// Where a connection stands in the pairing lifecycle.
///
/// Not stored anywhere; always read back from the waiting slot and the room
/// directory so it can never drift from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Waiting,
    Paired(RoomId),
}

impl SessionState {
    pub fn of(client_id: ClientId, matchmaker: &Matchmaker, rooms: &RoomDirectory) -> Self {
        if let Some(room_id) = rooms.room_of(client_id) {
            SessionState::Paired(room_id.clone())
        } else if matchmaker.is_waiting(client_id) {
            SessionState::Waiting
        } else {
            SessionState::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Outbox;

    #[test]
    fn test_state_follows_slot_and_directory() {
        let mut matchmaker = Matchmaker::new();
        let mut rooms = RoomDirectory::new();
        let a = ClientId::new_v4();
        let b = ClientId::new_v4();

        assert_eq!(SessionState::of(a, &matchmaker, &rooms), SessionState::Idle);

        matchmaker
            .request_match(a, &mut rooms, &mut Outbox::new())
            .unwrap();
        assert_eq!(SessionState::of(a, &matchmaker, &rooms), SessionState::Waiting);

        matchmaker
            .request_match(b, &mut rooms, &mut Outbox::new())
            .unwrap();
        let room_id = RoomId::from_pair(a, b);
        assert_eq!(
            SessionState::of(a, &matchmaker, &rooms),
            SessionState::Paired(room_id.clone())
        );
        assert_eq!(
            SessionState::of(b, &matchmaker, &rooms),
            SessionState::Paired(room_id)
        );
    }
}
