use super::ClientId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection not found: {0}")]
    ConnectionNotFound(ClientId),
    #[error("Send failed: {0}")]
    SendFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    InternalError(String),
}
