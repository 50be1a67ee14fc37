use crate::model::ClientId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the two participant ids inside a room id.
///
/// Never produced by the hyphenated textual form of a UUID.
pub const ROOM_ID_SEPARATOR: char = '#';

/// Identifier of a two-party room, derived from its participants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Builds the id for a pair, `first` (the party that was waiting) leading.
    pub fn from_pair(first: ClientId, second: ClientId) -> Self {
        RoomId(format!("{first}{ROOM_ID_SEPARATOR}{second}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        RoomId(value.to_string())
    }
}

impl From<String> for RoomId {
    fn from(value: String) -> Self {
        RoomId(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live pairing. Membership is fixed for the lifetime of the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    participants: [ClientId; 2],
}

impl Room {
    pub(crate) fn new(first: ClientId, second: ClientId) -> Self {
        Room {
            id: RoomId::from_pair(first, second),
            participants: [first, second],
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn participants(&self) -> [ClientId; 2] {
        self.participants
    }

    pub fn contains(&self, client_id: ClientId) -> bool {
        self.participants.contains(&client_id)
    }

    /// The other participant, or `None` when `client_id` is not in this room.
    pub fn partner_of(&self, client_id: ClientId) -> Option<ClientId> {
        match self.participants {
            [a, b] if a == client_id => Some(b),
            [a, b] if b == client_id => Some(a),
            _ => None,
        }
    }
}

/// Why a room is being torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    Left,
    Disconnected,
}

impl TeardownReason {
    /// Text shown to the remaining participant.
    pub fn message(&self) -> &'static str {
        match self {
            TeardownReason::Left => "Your chat partner has left the chat.",
            TeardownReason::Disconnected => "Your chat partner has disconnected.",
        }
    }
}

impl fmt::Display for TeardownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeardownReason::Left => f.write_str("left"),
            TeardownReason::Disconnected => f.write_str("disconnected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_is_ordered_by_arrival() {
        let waiting = ClientId::from_u128(1);
        let joiner = ClientId::from_u128(2);

        let room_id = RoomId::from_pair(waiting, joiner);
        assert_eq!(
            room_id.as_str(),
            "00000000-0000-0000-0000-000000000001#00000000-0000-0000-0000-000000000002"
        );
        assert_ne!(room_id, RoomId::from_pair(joiner, waiting));
    }

    #[test]
    fn test_partner_of() {
        let a = ClientId::new_v4();
        let b = ClientId::new_v4();
        let room = Room::new(a, b);

        assert_eq!(room.partner_of(a), Some(b));
        assert_eq!(room.partner_of(b), Some(a));
        assert_eq!(room.partner_of(ClientId::new_v4()), None);
        assert!(room.contains(a));
        assert_eq!(room.id(), &RoomId::from_pair(a, b));
    }

    #[test]
    fn test_room_id_serializes_as_plain_string() {
        let room_id = RoomId::from("a#b");
        assert_eq!(serde_json::to_string(&room_id).unwrap(), r#""a#b""#);
    }

    #[test]
    fn test_teardown_reasons_are_readable() {
        assert!(!TeardownReason::Left.message().is_empty());
        assert!(!TeardownReason::Disconnected.message().is_empty());
        assert_ne!(
            TeardownReason::Left.message(),
            TeardownReason::Disconnected.message()
        );
    }
}
