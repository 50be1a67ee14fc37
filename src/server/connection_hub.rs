use super::Connection;
use crate::model::{ClientId, ConnectionRegistry, NetworkError, RoomId, ServerEvent};
use axum::extract::ws::Message;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::sync::RwLock;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, instrument, warn};

#[derive(Debug, Default)]
struct Groups {
    members: HashMap<RoomId, Vec<ClientId>>,
    memberships: HashMap<ClientId, HashSet<RoomId>>,
}

/// Live WebSocket connections and the room groups they belong to.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    connections: RwLock<HashMap<ClientId, Connection>>,
    groups: RwLock<Groups>,
}

fn internal<E: Display>(e: E) -> NetworkError {
    error!(error = %e, "Connection hub lock poisoned");
    NetworkError::InternalError(e.to_string())
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip(self, connection), fields(client_id = %connection.client_id))]
    pub fn add_connection(&self, connection: Connection) -> Result<(), NetworkError> {
        let mut connections = self.connections.write().map_err(internal)?;
        connections.insert(connection.client_id, connection);
        debug!(connection_count = connections.len(), "Connection added");
        Ok(())
    }

    /// Unregisters a connection and drops it from every group it was in.
    #[instrument(skip(self))]
    pub fn remove_connection(&self, client_id: ClientId) -> Result<Option<Connection>, NetworkError> {
        let removed = self
            .connections
            .write()
            .map_err(internal)?
            .remove(&client_id);

        let mut groups = self.groups.write().map_err(internal)?;
        if let Some(room_ids) = groups.memberships.remove(&client_id) {
            for room_id in room_ids {
                Self::remove_member(&mut groups, client_id, &room_id);
            }
        }
        debug!(removed = removed.is_some(), "Connection removed");
        Ok(removed)
    }

    pub fn get_connection(&self, client_id: ClientId) -> Result<Option<Connection>, NetworkError> {
        Ok(self
            .connections
            .read()
            .map_err(internal)?
            .get(&client_id)
            .cloned())
    }

    pub fn connection_count(&self) -> Result<usize, NetworkError> {
        Ok(self.connections.read().map_err(internal)?.len())
    }

    pub fn group_members(&self, room_id: &RoomId) -> Result<Vec<ClientId>, NetworkError> {
        Ok(self
            .groups
            .read()
            .map_err(internal)?
            .members
            .get(room_id)
            .cloned()
            .unwrap_or_default())
    }

    fn remove_member(groups: &mut Groups, client_id: ClientId, room_id: &RoomId) {
        if let Some(members) = groups.members.get_mut(room_id) {
            members.retain(|id| *id != client_id);
            if members.is_empty() {
                groups.members.remove(room_id);
                debug!(%room_id, "Released empty group");
            }
        }
    }

    /// Queues a frame without waiting. A connection whose queue is full is
    /// not reading its socket; the frame is dropped.
    fn send(connection: &Connection, text: &str) -> Result<(), NetworkError> {
        match connection.sender.try_send(Message::Text(text.to_string())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(client_id = %connection.client_id, "Outbound queue full, dropping frame");
                Err(NetworkError::SendFailed(format!(
                    "outbound queue full for {}",
                    connection.client_id
                )))
            }
            Err(TrySendError::Closed(_)) => Err(NetworkError::SendFailed(format!(
                "connection {} closed",
                connection.client_id
            ))),
        }
    }
}

impl ConnectionRegistry for ConnectionHub {
    #[instrument(skip(self, event))]
    fn emit(&self, client_id: ClientId, event: &ServerEvent) -> Result<(), NetworkError> {
        let text = event.to_json()?;
        let connection = self
            .get_connection(client_id)?
            .ok_or(NetworkError::ConnectionNotFound(client_id))?;
        Self::send(&connection, &text)
    }

    #[instrument(skip(self))]
    fn join_group(&self, client_id: ClientId, room_id: &RoomId) -> Result<(), NetworkError> {
        if !self.is_connected(client_id) {
            return Err(NetworkError::ConnectionNotFound(client_id));
        }
        let mut groups = self.groups.write().map_err(internal)?;
        let newly_joined = groups
            .memberships
            .entry(client_id)
            .or_default()
            .insert(room_id.clone());
        if newly_joined {
            groups
                .members
                .entry(room_id.clone())
                .or_default()
                .push(client_id);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    fn leave_group(&self, client_id: ClientId, room_id: &RoomId) -> Result<(), NetworkError> {
        let mut groups = self.groups.write().map_err(internal)?;
        if let Some(room_ids) = groups.memberships.get_mut(&client_id) {
            room_ids.remove(room_id);
            if room_ids.is_empty() {
                groups.memberships.remove(&client_id);
            }
        }
        Self::remove_member(&mut groups, client_id, room_id);
        Ok(())
    }

    #[instrument(skip(self, event))]
    fn broadcast_to_group(
        &self,
        room_id: &RoomId,
        event: &ServerEvent,
        exclude: Option<ClientId>,
    ) -> Result<(), NetworkError> {
        let text = event.to_json()?;
        let members = self.group_members(room_id)?;
        let connections = self.connections.read().map_err(internal)?;

        let mut last_error = None;
        for client_id in members.into_iter().filter(|id| Some(*id) != exclude) {
            let result = connections
                .get(&client_id)
                .ok_or(NetworkError::ConnectionNotFound(client_id))
                .and_then(|connection| Self::send(connection, &text));
            if let Err(e) = result {
                warn!(%client_id, error = ?e, "Failed to deliver to group member");
                last_error = Some(e);
            }
        }
        last_error.map_or(Ok(()), Err)
    }

    fn is_connected(&self, client_id: ClientId) -> bool {
        self.connections
            .read()
            .map(|connections| connections.contains_key(&client_id))
            .unwrap_or(false)
    }
}
