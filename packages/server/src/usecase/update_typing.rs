//! Typing relay: ephemeral state, never stored server-side.

use std::sync::Arc;

use crate::domain::{ChatRepository, ConnectionId, MessagePusher, ServerEvent};

/// Handles the `typing` event.
pub struct UpdateTypingUseCase {
    repository: Arc<dyn ChatRepository>,
    pusher: Arc<dyn MessagePusher>,
}

impl UpdateTypingUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { repository, pusher }
    }

    /// Relay a typing-state change to every other member of the sender's
    /// room. The sender never sees its own notice, and the server keeps no
    /// typing state; clearing the indicator is the sending client's job.
    pub async fn execute(&self, connection_id: &ConnectionId, is_typing: bool) {
        let Some(outcome) = self.repository.typing(connection_id).await else {
            tracing::debug!("dropped typing event from sessionless connection '{}'", connection_id);
            return;
        };

        let event = ServerEvent::UserTyping {
            username: outcome.username,
            is_typing,
        };
        self.pusher.broadcast(&outcome.others, &event).await;
    }
}
