//! Push seam for delivering events to connected clients.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, ServerEvent};

/// Per-connection outbound channel; the transport drains it into the
/// socket.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Delivers server events to connected clients.
///
/// Fire-and-forget: the engine's state transition is complete before any
/// of these are called, and delivery failures are never reported back to
/// it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Attach a connection's outbound channel.
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Detach a connection; subsequent sends to it are dropped.
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Send one event to one connection.
    async fn send(&self, target: &ConnectionId, event: &ServerEvent);

    /// Send one event to each target connection.
    async fn broadcast(&self, targets: &[ConnectionId], event: &ServerEvent);
}
