//! HTTP API response DTOs.

use serde::Serialize;

use crate::domain::{RoomDetail, RoomSummary};

/// One row of `GET /api/rooms`.
#[derive(Debug, Serialize)]
pub struct RoomSummaryDto {
    pub name: String,
    pub user_count: usize,
    pub message_count: usize,
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            name: summary.name.as_str().to_string(),
            user_count: summary.user_count,
            message_count: summary.message_count,
        }
    }
}

/// Roster entry in `GET /api/rooms/{room}`.
#[derive(Debug, Serialize)]
pub struct RoomUserDto {
    pub username: String,
    pub id: String,
}

/// Response body of `GET /api/rooms/{room}`.
#[derive(Debug, Serialize)]
pub struct RoomDetailDto {
    pub name: String,
    pub users: Vec<RoomUserDto>,
    pub message_count: usize,
}

impl From<RoomDetail> for RoomDetailDto {
    fn from(detail: RoomDetail) -> Self {
        Self {
            name: detail.name.as_str().to_string(),
            users: detail
                .users
                .into_iter()
                .map(|member| RoomUserDto {
                    username: member.username,
                    id: member.user_id.as_str().to_string(),
                })
                .collect(),
            message_count: detail.message_count,
        }
    }
}
