//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, JoinRequest},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // The connection id is transport-owned; a session appears only after a
    // join event.
    let connection_id = ConnectionId::generate();
    tracing::info!("new client connected: {}", connection_id);

    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (mut sender, mut receiver) = socket.split();

    // Channel the pusher writes into; drained into the socket below.
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.pusher.register_client(connection_id.clone(), tx).await;

    let recv_state = state.clone();
    let recv_connection_id = connection_id.clone();

    // Task receiving frames from this client and dispatching them
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("websocket error on '{}': {}", recv_connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(
                                "unparseable frame from '{}': {}",
                                recv_connection_id,
                                e
                            );
                            continue;
                        }
                    };
                    dispatch(&recv_state, &recv_connection_id, event).await;
                }
                Message::Close(_) => {
                    tracing::debug!("client '{}' requested close", recv_connection_id);
                    break;
                }
                // Ping/pong is handled by the protocol layer
                _ => {}
            }
        }
    });

    // Task forwarding pushed events to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // Whichever half finishes first tears down the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    tracing::info!("client disconnected: {}", connection_id);
    state.disconnect_usecase.execute(&connection_id).await;
}

async fn dispatch(state: &AppState, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::Join { username, room } => {
            state
                .join_room_usecase
                .execute(connection_id.clone(), JoinRequest::new(username, room))
                .await;
        }
        ClientEvent::Message { text } => {
            state.send_message_usecase.execute(connection_id, text).await;
        }
        ClientEvent::Typing { is_typing } => {
            state
                .update_typing_usecase
                .execute(connection_id, is_typing)
                .await;
        }
    }
}
