//! Message posting: append to the room history and fan out.

use std::sync::Arc;

use irori_shared::time::Clock;

use crate::domain::{
    ChatRepository, ConnectionId, MessagePayload, MessagePusher, ServerEvent, Timestamp,
};

/// Handles the `message` event.
pub struct SendMessageUseCase {
    repository: Arc<dyn ChatRepository>,
    pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            pusher,
            clock,
        }
    }

    /// Post a message from a connection to its room.
    ///
    /// The text is taken verbatim. A message from a connection without a
    /// session is dropped silently; the sender learns of success only by
    /// receiving its own broadcast copy.
    pub async fn execute(&self, connection_id: &ConnectionId, text: String) {
        let sent_at = Timestamp::new(self.clock.now_utc_millis());

        let Some(outcome) = self.repository.post_message(connection_id, text, sent_at).await
        else {
            tracing::debug!("dropped message from sessionless connection '{}'", connection_id);
            return;
        };

        tracing::debug!(
            "'{}' posted to room '{}'",
            outcome.message.username,
            outcome.message.room
        );

        let event = ServerEvent::Message(MessagePayload::from(&outcome.message));
        self.pusher.broadcast(&outcome.members, &event).await;
    }
}
