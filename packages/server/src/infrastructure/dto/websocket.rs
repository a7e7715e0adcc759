//! Inbound WebSocket events.

use serde::Deserialize;

/// Client → server events: one JSON object per text frame, discriminated
/// by the `type` field. Anything that fails to parse is dropped by the
/// handler, never answered.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Enter a room. Absent or blank fields fall back to the engine's
    /// defaults.
    Join {
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        room: Option<String>,
    },
    /// Post a message to the connection's room.
    Message { text: String },
    /// Ephemeral typing-state change.
    Typing {
        #[serde(rename = "isTyping")]
        is_typing: bool,
    },
}
