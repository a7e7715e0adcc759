//! Repository seam between the use cases and the engine state.

use async_trait::async_trait;

use super::{
    ConnectionId, JoinError, JoinOutcome, JoinRequest, LeaveOutcome, MessageOutcome, RoomDetail,
    RoomName, RoomSummary, Timestamp, TypingOutcome,
};

/// Access to the chat engine state.
///
/// Every method is one atomic transition (or read) of the engine; the
/// implementation enforces the single-writer model. The in-memory
/// implementation takes one coarse lock per call, which serializes all
/// mutations without per-room locks.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Register a session and enter it into its room.
    async fn join(
        &self,
        connection_id: ConnectionId,
        request: JoinRequest,
        joined_at: Timestamp,
    ) -> Result<JoinOutcome, JoinError>;

    /// Append a message from a connection to its room. `None` when the
    /// connection has no session.
    async fn post_message(
        &self,
        connection_id: &ConnectionId,
        text: String,
        sent_at: Timestamp,
    ) -> Option<MessageOutcome>;

    /// Resolve typing relay targets. `None` when the connection has no
    /// session.
    async fn typing(&self, connection_id: &ConnectionId) -> Option<TypingOutcome>;

    /// Remove a connection's session and membership. `None` when the
    /// connection never joined.
    async fn disconnect(&self, connection_id: &ConnectionId) -> Option<LeaveOutcome>;

    /// Delete a room iff it is still empty; the deferred-deletion
    /// re-check. Returns whether the room was deleted.
    async fn delete_room_if_empty(&self, room: &RoomName) -> bool;

    /// Summaries of all live rooms.
    async fn room_summaries(&self) -> Vec<RoomSummary>;

    /// Detail of one room, if it exists.
    async fn room_detail(&self, room: &RoomName) -> Option<RoomDetail>;
}
