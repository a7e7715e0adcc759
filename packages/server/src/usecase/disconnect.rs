//! Disconnect: tear down the session, notify the room, arm cleanup.

use std::sync::Arc;

use irori_shared::time::Clock;

use crate::domain::{ChatRepository, ConnectionId, MessagePusher, RoomUser, ServerEvent, Timestamp};

use super::room_cleanup::RoomCleanup;

/// Handles the transport-generated disconnect.
pub struct DisconnectUseCase {
    repository: Arc<dyn ChatRepository>,
    pusher: Arc<dyn MessagePusher>,
    cleanup: Arc<RoomCleanup>,
    clock: Arc<dyn Clock>,
}

impl DisconnectUseCase {
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

    /// Tear down a connection: detach its outbound channel, drop its
    /// session, notify the remaining members, and arm room cleanup when
    /// the room was left empty. A connection that never joined just gets
    /// detached.
    pub async fn execute(&self, connection_id: &ConnectionId) {
        self.pusher.unregister_client(connection_id).await;

        let left_at = Timestamp::new(self.clock.now_utc_millis());

        let Some(outcome) = self.repository.disconnect(connection_id).await else {
            tracing::debug!("connection '{}' closed without a session", connection_id);
            return;
        };

        tracing::info!(
            "'{}' left room '{}'",
            outcome.session.username,
            outcome.session.room
        );

        // 1. Leave notice to the remaining members; the departed session
        //    is already gone
        let notice = ServerEvent::UserLeft {
            username: outcome.session.username.clone(),
            timestamp: left_at.to_rfc3339(),
        };
        self.pusher.broadcast(&outcome.remaining, &notice).await;

        // 2. Refreshed roster to the remaining members
        let roster = ServerEvent::RoomUsers {
            users: outcome.roster.iter().map(RoomUser::from).collect(),
        };
        self.pusher.broadcast(&outcome.remaining, &roster).await;

        // 3. Empty room: deletion is deferred, not immediate
        if outcome.room_emptied {
            self.cleanup.schedule(outcome.session.room.clone()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use irori_shared::time::FixedClock;
    use mockall::Sequence;

    use crate::domain::{JoinRequest, MockMessagePusher, RoomName};
    use crate::infrastructure::repository::InMemoryChatRepository;

    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn build(
        pusher: MockMessagePusher,
    ) -> (DisconnectUseCase, Arc<InMemoryChatRepository>, Arc<RoomCleanup>) {
        let repository = Arc::new(InMemoryChatRepository::new());
        let cleanup = Arc::new(RoomCleanup::new(
            repository.clone(),
            Duration::from_secs(300),
        ));
        let usecase = DisconnectUseCase::new(
            repository.clone(),
            Arc::new(pusher),
            cleanup.clone(),
            Arc::new(FixedClock::new(NOW)),
        );
        (usecase, repository, cleanup)
    }

    async fn join(repository: &InMemoryChatRepository, connection: &str, username: &str) {
        repository
            .join(
                ConnectionId::new(connection),
                JoinRequest::new(Some(username.to_string()), Some("x".to_string())),
                Timestamp::new(NOW),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn remaining_members_get_leave_notice_then_roster() {
        // given: alice and bob in the room; bob disconnects
        let mut pusher = MockMessagePusher::new();
        let mut seq = Sequence::new();
        let bob = ConnectionId::new("c-bob");

        let unregistered = bob.clone();
        pusher
            .expect_unregister_client()
            .once()
            .in_sequence(&mut seq)
            .withf(move |connection_id| *connection_id == unregistered)
            .returning(|_| ());
        pusher
            .expect_broadcast()
            .once()
            .in_sequence(&mut seq)
            .withf(|targets, event| {
                targets.len() == 1
                    && targets[0] == ConnectionId::new("c-alice")
                    && matches!(event, ServerEvent::UserLeft { username, .. } if username == "bob")
            })
            .returning(|_, _| ());
        pusher
            .expect_broadcast()
            .once()
            .in_sequence(&mut seq)
            .withf(|targets, event| {
                targets.len() == 1
                    && matches!(
                        event,
                        ServerEvent::RoomUsers { users }
                            if users.len() == 1 && users[0].username == "alice"
                    )
            })
            .returning(|_, _| ());

        let (usecase, repository, cleanup) = build(pusher);
        join(&repository, "c-alice", "alice").await;
        join(&repository, "c-bob", "bob").await;

        // when:
        usecase.execute(&bob).await;

        // then: the room is still occupied, so no cleanup was armed
        assert!(!cleanup.is_armed(&RoomName::new("x")).await);
        assert!(repository.room_detail(&RoomName::new("x")).await.is_some());
    }

    #[tokio::test]
    async fn last_member_leaving_arms_the_cleanup_timer() {
        // given:
        let mut pusher = MockMessagePusher::new();
        pusher.expect_unregister_client().once().returning(|_| ());
        pusher
            .expect_broadcast()
            .times(2)
            .withf(|targets, _| targets.is_empty())
            .returning(|_, _| ());

        let (usecase, repository, cleanup) = build(pusher);
        join(&repository, "c-alice", "alice").await;

        // when:
        usecase.execute(&ConnectionId::new("c-alice")).await;

        // then: deletion is deferred behind the grace timer
        assert!(cleanup.is_armed(&RoomName::new("x")).await);
        assert!(repository.room_detail(&RoomName::new("x")).await.is_some());
    }

    #[tokio::test]
    async fn sessionless_disconnect_only_detaches_the_channel() {
        // given: no broadcast expectations; any would panic
        let mut pusher = MockMessagePusher::new();
        pusher.expect_unregister_client().once().returning(|_| ());

        let (usecase, _repository, cleanup) = build(pusher);

        // when:
        usecase.execute(&ConnectionId::new("c-ghost")).await;

        // then:
        assert!(!cleanup.is_armed(&RoomName::new("general")).await);
    }
}
