use crate::handler::SessionRouter;
use crate::model::{ClientEvent, ClientId, SessionError};
use crate::server::{AppState, Connection};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::ops::ControlFlow;
use tokio::sync::mpsc::{self, Receiver};
use tracing::{debug, error, info, instrument, warn};

pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    debug!("New WebSocket upgrade request");
    ws.max_message_size(state.config.max_frame_bytes)
        .on_upgrade(move |socket| listen(socket, state, ClientId::new_v4()))
}

#[instrument(skip(socket, state))]
async fn listen(socket: WebSocket, state: AppState, client_id: ClientId) {
    let (ws_sender, ws_receiver) = socket.split();
    let (tx, rx) = mpsc::channel(state.config.outbound_queue.max(1));

    if let Err(e) = state.hub.add_connection(Connection::new(client_id, tx)) {
        error!(error = ?e, "Failed to register connection");
        return;
    }
    info!("Client connected");

    let sender_task = handle_outgoing_messages(rx, ws_sender);
    let receiver_task = handle_incoming_messages(ws_receiver, client_id, &state.router);

    tokio::select! {
        _ = sender_task => {
            info!("Sender task completed");
        }
        _ = receiver_task => {
            info!("Receiver task completed");
        }
    }

    if let Err(e) = state.hub.remove_connection(client_id) {
        error!(error = ?e, "Failed to unregister connection");
    }
    match state.router.disconnect(client_id) {
        Ok(Some(room_id)) => info!(%room_id, "Client disconnected, room closed"),
        Ok(None) => info!("Client disconnected"),
        Err(e) => error!(error = ?e, "Failed to clean up after disconnect"),
    }
}

#[instrument(skip(rx, ws_sender))]
pub async fn handle_outgoing_messages(
    mut rx: Receiver<Message>,
    mut ws_sender: SplitSink<WebSocket, Message>,
) {
    debug!("Started handling outgoing messages");
    while let Some(msg) = rx.recv().await {
        debug!(?msg, "Sending message");
        if let Err(e) = ws_sender.send(msg).await {
            error!(error = ?e, "Failed to send message");
            break;
        }
    }
}

#[instrument(skip(receiver, router))]
pub async fn handle_incoming_messages(
    mut receiver: SplitStream<WebSocket>,
    client_id: ClientId,
    router: &SessionRouter,
) {
    debug!("Started handling incoming messages");
    while let Some(message) = receiver.next().await {
        match message {
            Ok(message) => {
                if handle_message(message, client_id, router).is_break() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = ?e, "Failed to receive message");
                break;
            }
        }
    }
}

/// Feeds one frame to the router. Breaks when the client closed the socket.
pub fn handle_message(
    message: Message,
    client_id: ClientId,
    router: &SessionRouter,
) -> ControlFlow<()> {
    match message {
        Message::Text(text) => {
            let result = ClientEvent::parse(&text).and_then(|event| {
                debug!(?event, "Parsed event");
                router.dispatch(client_id, event)
            });
            if let Err(e) = result {
                log_dropped(&e);
            }
        }
        Message::Close(_) => {
            info!(%client_id, "Client sent close frame");
            return ControlFlow::Break(());
        }
        Message::Ping(_) | Message::Pong(_) => {}
        Message::Binary(_) => {
            debug!(%client_id, "Dropping binary frame");
        }
    }
    ControlFlow::Continue(())
}

fn log_dropped(e: &SessionError) {
    match e {
        SessionError::Internal(_) => error!(error = %e, "Event failed"),
        _ => debug!(error = %e, "Event dropped"),
    }
}
