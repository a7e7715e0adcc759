//! Chat messages and timestamps.

use uuid::Uuid;

use super::RoomName;

/// Unix timestamp in UTC milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// RFC 3339 / ISO-8601 rendering used on the wire.
    pub fn to_rfc3339(&self) -> String {
        irori_shared::time::timestamp_to_rfc3339(self.0)
    }
}

/// Unique message identifier (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(String);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A message posted to a room.
///
/// Immutable once created; only ever dropped from the front of a room's
/// history when the history bound is exceeded.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub username: String,
    pub text: String,
    pub timestamp: Timestamp,
    pub room: RoomName,
}

impl ChatMessage {
    /// Create a message with a fresh id. The text is taken verbatim; any
    /// escaping is the rendering client's responsibility.
    pub fn new(username: String, text: String, timestamp: Timestamp, room: RoomName) -> Self {
        Self {
            id: MessageId::generate(),
            username,
            text,
            timestamp,
            room,
        }
    }
}
