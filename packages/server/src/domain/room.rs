//! Rooms: named channels with a member set and a bounded message history.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use super::{ChatMessage, ConnectionId, SessionRegistry, UserId};

/// Maximum number of messages retained per room. On overflow the oldest
/// entries are dropped first; the retained suffix keeps its order.
pub const MESSAGE_HISTORY_LIMIT: usize = 100;

/// Name of a chat room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roster entry: a room member as seen by other clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    pub username: String,
    pub user_id: UserId,
}

/// One chat room: member connections in join order plus the retained
/// message history, oldest first.
#[derive(Debug, Default)]
pub struct Room {
    messages: VecDeque<ChatMessage>,
    members: Vec<ConnectionId>,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member connection; no-op if already present.
    pub fn add_member(&mut self, connection_id: ConnectionId) {
        if !self.members.contains(&connection_id) {
            self.members.push(connection_id);
        }
    }

    /// Remove a member connection; no-op if absent.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) {
        self.members.retain(|id| id != connection_id);
    }

    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Append a message, trimming the front down to the retention limit.
    pub fn append_message(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > MESSAGE_HISTORY_LIMIT {
            self.messages.pop_front();
        }
    }

    /// Snapshot of the history, oldest first.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// All live rooms, keyed by name. A room is present iff it has at least one
/// member or is within its post-empty grace period.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<RoomName, Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the existing room or create an empty one. Idempotent.
    pub fn ensure_room(&mut self, name: &RoomName) -> &mut Room {
        self.rooms.entry(name.clone()).or_default()
    }

    pub fn get(&self, name: &RoomName) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Remove a member from a room; no-op if the room or membership is
    /// absent.
    pub fn remove_member(&mut self, name: &RoomName, connection_id: &ConnectionId) {
        if let Some(room) = self.rooms.get_mut(name) {
            room.remove_member(connection_id);
        }
    }

    /// Append a message to a room's history. The room must already exist
    /// (callers go through `ensure_room` on join); appending to an unknown
    /// room is a contract violation, not a runtime condition.
    pub fn append_message(&mut self, name: &RoomName, message: ChatMessage) {
        debug_assert!(
            self.rooms.contains_key(name),
            "append to unknown room '{name}'"
        );
        if let Some(room) = self.rooms.get_mut(name) {
            room.append_message(message);
        }
    }

    /// Resolve a room's members through the session registry, in join
    /// order. Entries whose session no longer resolves are silently
    /// dropped; a disconnect may race the snapshot.
    pub fn snapshot_members(&self, name: &RoomName, sessions: &SessionRegistry) -> Vec<RoomMember> {
        let Some(room) = self.rooms.get(name) else {
            return Vec::new();
        };
        room.members()
            .iter()
            .filter_map(|connection_id| sessions.lookup(connection_id))
            .map(|session| RoomMember {
                username: session.username.clone(),
                user_id: session.user_id.clone(),
            })
            .collect()
    }

    /// Whether a room has no members. An unknown room counts as empty.
    pub fn is_empty(&self, name: &RoomName) -> bool {
        self.rooms.get(name).is_none_or(Room::is_empty)
    }

    /// Delete a room outright. Returns whether a room was removed.
    pub fn delete(&mut self, name: &RoomName) -> bool {
        self.rooms.remove(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoomName, &Room)> {
        self.rooms.iter()
    }
}
