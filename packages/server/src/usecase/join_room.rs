//! Join: register the session, enter the room, run the presence
//! broadcasts.

use std::sync::Arc;

use irori_shared::time::Clock;

use crate::domain::{
    ChatRepository, ConnectionId, JoinRequest, MessagePayload, MessagePusher, RoomUser,
    ServerEvent, Timestamp,
};

use super::room_cleanup::RoomCleanup;

/// Handles the `join` event.
pub struct JoinRoomUseCase {
    repository: Arc<dyn ChatRepository>,
    pusher: Arc<dyn MessagePusher>,
    cleanup: Arc<RoomCleanup>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        pusher: Arc<dyn MessagePusher>,
        cleanup: Arc<RoomCleanup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            pusher,
            cleanup,
            clock,
        }
    }

    /// Handle a join request from a connection.
    ///
    /// The joiner gets the private `joinedRoom` acknowledgment first, the
    /// other members a `userJoined` notice, and the whole room a fresh
    /// roster. A second join on an already-joined connection is rejected
    /// and emits nothing.
    pub async fn execute(&self, connection_id: ConnectionId, request: JoinRequest) {
        let joined_at = Timestamp::new(self.clock.now_utc_millis());

        let outcome = match self.repository.join(connection_id.clone(), request, joined_at).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("rejected join from '{}': {}", connection_id, e);
                return;
            }
        };

        // Any pending deletion of this room is now stale.
        self.cleanup.cancel(&outcome.session.room).await;

        tracing::info!(
            "'{}' joined room '{}'",
            outcome.session.username,
            outcome.session.room
        );

        // 1. Private acknowledgment with the backlog, to the joiner only
        let ack = ServerEvent::JoinedRoom {
            room: outcome.session.room.as_str().to_string(),
            username: outcome.session.username.clone(),
            messages: outcome.history.iter().map(MessagePayload::from).collect(),
        };
        self.pusher.send(&outcome.session.connection_id, &ack).await;

        // 2. Join notice to everyone but the joiner
        let notice = ServerEvent::UserJoined {
            username: outcome.session.username.clone(),
            timestamp: joined_at.to_rfc3339(),
        };
        self.pusher.broadcast(&outcome.others, &notice).await;

        // 3. Fresh roster to the whole room, joiner included
        let roster = ServerEvent::RoomUsers {
            users: outcome.roster.iter().map(RoomUser::from).collect(),
        };
        self.pusher.broadcast(&outcome.members, &roster).await;
    }
}
