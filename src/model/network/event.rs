use super::NetworkError;
use crate::model::{RoomId, SessionError};
use serde::{Deserialize, Serialize};

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Join,
    Message {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        msg: String,
    },
    LeaveRoom {
        #[serde(rename = "roomId")]
        room_id: RoomId,
    },
}

impl ClientEvent {
    pub fn parse(text: &str) -> Result<Self, SessionError> {
        serde_json::from_str(text).map_err(|e| SessionError::MalformedEvent(e.to_string()))
    }
}

/// Events the server sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Waiting,
    Matched(RoomId),
    Message(String),
    PartnerDisconnected(String),
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, NetworkError> {
        Ok(serde_json::to_string(self)?)
    }
}
