use uuid::Uuid;

/// Identifier the transport assigns to a live connection.
pub type ClientId = Uuid;
