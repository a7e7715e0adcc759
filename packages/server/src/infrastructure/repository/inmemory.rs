//! In-memory chat repository.
//!
//! Holds the whole engine state behind one coarse lock. Every inbound
//! event is a single lock acquisition, which serializes all mutations
//! into the single-writer ordering the engine assumes. There are no
//! per-room locks, so cross-room operations cannot deadlock.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatRepository, ChatState, ConnectionId, JoinError, JoinOutcome, JoinRequest, LeaveOutcome,
    MessageOutcome, RoomDetail, RoomName, RoomSummary, Timestamp, TypingOutcome,
};

/// `ChatRepository` backed by a `ChatState` under a single `Mutex`.
#[derive(Default)]
pub struct InMemoryChatRepository {
    state: Mutex<ChatState>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn join(
        &self,
        connection_id: ConnectionId,
        request: JoinRequest,
        joined_at: Timestamp,
    ) -> Result<JoinOutcome, JoinError> {
        self.state.lock().await.join(connection_id, &request, joined_at)
    }

    async fn post_message(
        &self,
        connection_id: &ConnectionId,
        text: String,
        sent_at: Timestamp,
    ) -> Option<MessageOutcome> {
        self.state.lock().await.post_message(connection_id, text, sent_at)
    }

    async fn typing(&self, connection_id: &ConnectionId) -> Option<TypingOutcome> {
        self.state.lock().await.typing(connection_id)
    }

    async fn disconnect(&self, connection_id: &ConnectionId) -> Option<LeaveOutcome> {
        self.state.lock().await.disconnect(connection_id)
    }

    async fn delete_room_if_empty(&self, room: &RoomName) -> bool {
        self.state.lock().await.delete_room_if_empty(room)
    }

    async fn room_summaries(&self) -> Vec<RoomSummary> {
        self.state.lock().await.room_summaries()
    }

    async fn room_detail(&self, room: &RoomName) -> Option<RoomDetail> {
        self.state.lock().await.room_detail(room)
    }
}
