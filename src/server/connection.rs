use crate::model::ClientId;
use axum::extract::ws::Message;
use tokio::sync::mpsc::Sender;

#[derive(Debug, Clone)]
pub struct Connection {
    pub client_id: ClientId,
    pub sender: Sender<Message>,
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.client_id == other.client_id
    }
}

impl Connection {
    pub fn new(client_id: ClientId, sender: Sender<Message>) -> Self {
        Connection { client_id, sender }
    }
}
