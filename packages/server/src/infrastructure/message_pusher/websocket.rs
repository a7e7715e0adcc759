//! WebSocket message pusher.
//!
//! Keeps one outbound channel per connection and fans events out to
//! target lists. Each event is serialized once; every recipient gets its
//! own copy of the string. A failed send means the receiving half is gone
//! and the connection is being torn down, so it is logged and ignored.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, ServerEvent};

#[derive(Default)]
pub struct WebSocketMessagePusher {
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.clients.lock().await.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.clients.lock().await.remove(connection_id);
    }

    async fn send(&self, target: &ConnectionId, event: &ServerEvent) {
        let payload = serde_json::to_string(event).unwrap();
        let clients = self.clients.lock().await;
        if let Some(sender) = clients.get(target) {
            if sender.send(payload).is_err() {
                tracing::warn!("failed to push event to client '{}'", target);
            }
        }
    }

    async fn broadcast(&self, targets: &[ConnectionId], event: &ServerEvent) {
        let payload = serde_json::to_string(event).unwrap();
        let clients = self.clients.lock().await;
        for target in targets {
            if let Some(sender) = clients.get(target) {
                if sender.send(payload.clone()).is_err() {
                    tracing::warn!("failed to push event to client '{}'", target);
                }
            }
        }
    }
}
