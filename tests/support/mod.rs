pub mod mock_registry;

use mock_registry::MockRegistry;
use pairchat::prelude::*;
use std::sync::Arc;

/// A router wired to an in-memory registry.
pub struct ChatFixture {
    pub registry: Arc<MockRegistry>,
    pub router: SessionRouter,
}

impl ChatFixture {
    pub fn new() -> Self {
        let registry = Arc::new(MockRegistry::new());
        let router = SessionRouter::new(registry.clone());
        Self { registry, router }
    }

    pub fn connect(&self) -> ClientId {
        self.registry.connect()
    }

    pub fn join(&self, client_id: ClientId) -> Result<(), SessionError> {
        self.router.dispatch(client_id, ClientEvent::Join)
    }

    pub fn send(&self, client_id: ClientId, room_id: &RoomId, msg: &str) -> Result<(), SessionError> {
        self.router.dispatch(
            client_id,
            ClientEvent::Message {
                room_id: room_id.clone(),
                msg: msg.to_string(),
            },
        )
    }

    pub fn leave(&self, client_id: ClientId, room_id: &RoomId) -> Result<(), SessionError> {
        self.router.dispatch(
            client_id,
            ClientEvent::LeaveRoom {
                room_id: room_id.clone(),
            },
        )
    }

    /// Closes the connection the way the transport does: unregister, then
    /// let the router clean up.
    pub fn disconnect(&self, client_id: ClientId) -> Option<RoomId> {
        self.registry.disconnect(client_id);
        self.router
            .disconnect(client_id)
            .expect("disconnect should not fail")
    }

    /// Pairs two fresh connections and returns them with their room.
    pub fn pair(&self) -> (ClientId, ClientId, RoomId) {
        let a = self.connect();
        let b = self.connect();
        self.join(a).expect("first join");
        self.join(b).expect("second join");
        (a, b, RoomId::from_pair(a, b))
    }

    /// Asserts the directory-wide membership invariant.
    pub fn assert_rooms_consistent(&self) {
        let rooms = self.router.rooms().expect("rooms");
        let mut seen = std::collections::HashSet::new();
        for room in rooms {
            let [a, b] = room.participants();
            assert_ne!(a, b, "room {} has a duplicate participant", room.id());
            assert!(seen.insert(a), "{a} is in more than one room");
            assert!(seen.insert(b), "{b} is in more than one room");
            for participant in [a, b] {
                assert_eq!(
                    self.router.state_of(participant).unwrap(),
                    SessionState::Paired(room.id().clone())
                );
            }
        }
    }
}
