//! Read-only room views for the ops HTTP surface.

use std::sync::Arc;

use crate::domain::{ChatRepository, RoomDetail, RoomName, RoomSummary};

/// Lists all live rooms.
pub struct GetRoomsUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.repository.room_summaries().await
    }
}

/// Looks up one room by name.
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room: &RoomName) -> Option<RoomDetail> {
        self.repository.room_detail(room).await
    }
}
