//! Outbound protocol events.
//!
//! One JSON object per event, discriminated by a `type` field. The field
//! names here are the wire contract the browser client consumes; changing
//! them breaks deployed clients.

use serde::Serialize;

use super::{ChatMessage, RoomMember};

/// Wire form of a chat message.
#[derive(Debug, Clone, Serialize)]
pub struct MessagePayload {
    pub id: String,
    pub username: String,
    pub text: String,
    pub timestamp: String,
    pub room: String,
}

impl From<&ChatMessage> for MessagePayload {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            username: message.username.clone(),
            text: message.text.clone(),
            timestamp: message.timestamp.to_rfc3339(),
            room: message.room.as_str().to_string(),
        }
    }
}

/// Roster entry as sent to clients.
#[derive(Debug, Clone, Serialize)]
pub struct RoomUser {
    pub username: String,
    pub id: String,
}

impl From<&RoomMember> for RoomUser {
    fn from(member: &RoomMember) -> Self {
        Self {
            username: member.username.clone(),
            id: member.user_id.as_str().to_string(),
        }
    }
}

/// Server → client events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Private acknowledgment to the joining session, with the room's
    /// backlog oldest first.
    JoinedRoom {
        room: String,
        username: String,
        messages: Vec<MessagePayload>,
    },
    /// A posted message, fanned out to every room member including the
    /// sender.
    Message(MessagePayload),
    /// Membership notice to every member except the joiner.
    UserJoined { username: String, timestamp: String },
    /// Membership notice to the remaining members.
    UserLeft { username: String, timestamp: String },
    /// Full roster, sent to the whole room after any membership change.
    RoomUsers { users: Vec<RoomUser> },
    /// Typing relay; never echoed back to the sender.
    UserTyping {
        username: String,
        #[serde(rename = "isTyping")]
        is_typing: bool,
    },
}
