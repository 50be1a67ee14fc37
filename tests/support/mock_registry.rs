use pairchat::model::{ClientId, ConnectionRegistry, NetworkError, RoomId, ServerEvent};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory transport that records every delivered event per connection.
#[derive(Default)]
pub struct MockRegistry {
    connected: Mutex<HashSet<ClientId>>,
    groups: Mutex<HashMap<RoomId, Vec<ClientId>>>,
    inboxes: Mutex<HashMap<ClientId, Vec<ServerEvent>>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self) -> ClientId {
        let client_id = ClientId::new_v4();
        self.connected.lock().unwrap().insert(client_id);
        client_id
    }

    pub fn disconnect(&self, client_id: ClientId) {
        self.connected.lock().unwrap().remove(&client_id);
        for members in self.groups.lock().unwrap().values_mut() {
            members.retain(|id| *id != client_id);
        }
    }

    /// Everything delivered to `client_id` so far.
    pub fn received(&self, client_id: ClientId) -> Vec<ServerEvent> {
        self.inboxes
            .lock()
            .unwrap()
            .get(&client_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drains and returns what `client_id` received.
    pub fn take(&self, client_id: ClientId) -> Vec<ServerEvent> {
        self.inboxes
            .lock()
            .unwrap()
            .remove(&client_id)
            .unwrap_or_default()
    }

    pub fn group(&self, room_id: &RoomId) -> Vec<ClientId> {
        self.groups
            .lock()
            .unwrap()
            .get(room_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl ConnectionRegistry for MockRegistry {
    fn emit(&self, client_id: ClientId, event: &ServerEvent) -> Result<(), NetworkError> {
        if !self.is_connected(client_id) {
            return Err(NetworkError::ConnectionNotFound(client_id));
        }
        self.inboxes
            .lock()
            .unwrap()
            .entry(client_id)
            .or_default()
            .push(event.clone());
        Ok(())
    }

    fn join_group(&self, client_id: ClientId, room_id: &RoomId) -> Result<(), NetworkError> {
        let mut groups = self.groups.lock().unwrap();
        let members = groups.entry(room_id.clone()).or_default();
        if !members.contains(&client_id) {
            members.push(client_id);
        }
        Ok(())
    }

    fn leave_group(&self, client_id: ClientId, room_id: &RoomId) -> Result<(), NetworkError> {
        let mut groups = self.groups.lock().unwrap();
        if let Some(members) = groups.get_mut(room_id) {
            members.retain(|id| *id != client_id);
            if members.is_empty() {
                groups.remove(room_id);
            }
        }
        Ok(())
    }

    fn broadcast_to_group(
        &self,
        room_id: &RoomId,
        event: &ServerEvent,
        exclude: Option<ClientId>,
    ) -> Result<(), NetworkError> {
        for member in self.group(room_id) {
            if Some(member) != exclude {
                self.emit(member, event)?;
            }
        }
        Ok(())
    }

    fn is_connected(&self, client_id: ClientId) -> bool {
        self.connected.lock().unwrap().contains(&client_id)
    }
}
