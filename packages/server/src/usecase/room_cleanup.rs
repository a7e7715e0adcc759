//! Deferred deletion of empty rooms.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::domain::{ChatRepository, RoomName};

/// Grace period an empty room survives before deletion.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(300);

/// Schedules deletion of rooms that were left empty: one cancellable task
/// per room, keyed by name. Re-arming supersedes the previous task, and
/// the task re-checks emptiness when it fires, so a rejoin during the
/// grace window never loses an active room.
pub struct RoomCleanup {
    repository: Arc<dyn ChatRepository>,
    grace_period: Duration,
    pending: Arc<Mutex<HashMap<RoomName, JoinHandle<()>>>>,
}

impl RoomCleanup {
    pub fn new(repository: Arc<dyn ChatRepository>, grace_period: Duration) -> Self {
        Self {
            repository,
            grace_period,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arm (or re-arm) the deletion timer for a room. Any previously
    /// armed timer for the same room is aborted first; two competing
    /// deletions for one room must never run.
    pub async fn schedule(&self, room: RoomName) {
        let mut pending = self.pending.lock().await;
        if let Some(prior) = pending.remove(&room) {
            prior.abort();
        }

        let repository = Arc::clone(&self.repository);
        let pending_map = Arc::clone(&self.pending);
        let grace_period = self.grace_period;
        let key = room.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(grace_period).await;
            pending_map.lock().await.remove(&key);
            // A member may have joined and left again since the timer was
            // armed; only the fire-time emptiness check decides.
            if repository.delete_room_if_empty(&key).await {
                tracing::info!("deleted room '{}' after grace period", key);
            }
        });
        pending.insert(room, handle);
    }

    /// Drop any pending deletion for a room. Called on rejoin.
    pub async fn cancel(&self, room: &RoomName) {
        if let Some(handle) = self.pending.lock().await.remove(room) {
            handle.abort();
        }
    }

    /// Whether a deletion timer is currently armed for a room.
    pub async fn is_armed(&self, room: &RoomName) -> bool {
        self.pending.lock().await.contains_key(room)
    }
}
