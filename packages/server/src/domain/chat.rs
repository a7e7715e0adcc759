//! The chat engine's state machine.
//!
//! Every inbound event runs exactly one transition against this state.
//! Each transition computes both the mutation and the fan-out target
//! lists, so a broadcast always reflects a snapshot taken atomically with
//! the change that triggered it.

use thiserror::Error;

use super::{
    ChatMessage, ConnectionId, JoinRequest, RoomMember, RoomName, RoomStore, Session,
    SessionRegistry, Timestamp,
};

#[derive(Debug, Error)]
pub enum JoinError {
    /// The connection already has a live session. A session's room is
    /// fixed for its lifetime, so a second join is rejected outright
    /// instead of silently rebinding the connection.
    #[error("connection '{0}' already has a live session")]
    AlreadyJoined(ConnectionId),
}

/// Result of a successful join, carrying everything the presence
/// broadcasts need.
#[derive(Debug)]
pub struct JoinOutcome {
    pub session: Session,
    /// Room history at join time, oldest first.
    pub history: Vec<ChatMessage>,
    /// Roster after the join, including the joiner.
    pub roster: Vec<RoomMember>,
    /// Members to notify of the join: everyone but the joiner.
    pub others: Vec<ConnectionId>,
    /// Every member of the room, including the joiner.
    pub members: Vec<ConnectionId>,
}

/// Result of posting a message.
#[derive(Debug)]
pub struct MessageOutcome {
    pub message: ChatMessage,
    /// Every member of the room, including the sender.
    pub members: Vec<ConnectionId>,
}

/// Result of a typing-state change.
#[derive(Debug)]
pub struct TypingOutcome {
    pub username: String,
    /// Members to relay to: everyone but the sender.
    pub others: Vec<ConnectionId>,
}

/// Result of a disconnect that had a session.
#[derive(Debug)]
pub struct LeaveOutcome {
    pub session: Session,
    /// Roster after the removal.
    pub roster: Vec<RoomMember>,
    /// Members still in the room.
    pub remaining: Vec<ConnectionId>,
    /// Whether the removal left the room empty; the caller arms the
    /// deferred-deletion timer when it did.
    pub room_emptied: bool,
}

/// Read-only view of one room for the ops surface.
#[derive(Debug)]
pub struct RoomSummary {
    pub name: RoomName,
    pub user_count: usize,
    pub message_count: usize,
}

/// Read-only detail of one room for the ops surface.
#[derive(Debug)]
pub struct RoomDetail {
    pub name: RoomName,
    pub users: Vec<RoomMember>,
    pub message_count: usize,
}

/// State owned by the single logical actor: the session registry and the
/// room store. All mutation goes through the transition methods below;
/// the caller serializes them (one coarse lock in the in-memory
/// repository).
#[derive(Debug, Default)]
pub struct ChatState {
    sessions: SessionRegistry,
    rooms: RoomStore,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and enter it into its room.
    ///
    /// Creates the room lazily on first join. Rejects a second join on a
    /// connection that already has a session, leaving all state untouched.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        request: &JoinRequest,
        joined_at: Timestamp,
    ) -> Result<JoinOutcome, JoinError> {
        if self.sessions.lookup(&connection_id).is_some() {
            return Err(JoinError::AlreadyJoined(connection_id));
        }

        let session = self.sessions.register(connection_id.clone(), request, joined_at);

        let room = self.rooms.ensure_room(&session.room);
        room.add_member(connection_id.clone());
        let history = room.history();
        let members = room.members().to_vec();

        let others = members
            .iter()
            .filter(|id| **id != connection_id)
            .cloned()
            .collect();
        let roster = self.rooms.snapshot_members(&session.room, &self.sessions);

        Ok(JoinOutcome {
            session,
            history,
            roster,
            others,
            members,
        })
    }

    /// Append a message from a connection to its room's history.
    ///
    /// Returns `None` when the connection has no session (the message
    /// raced a join or a disconnect); the event is then dropped without
    /// any broadcast.
    pub fn post_message(
        &mut self,
        connection_id: &ConnectionId,
        text: String,
        sent_at: Timestamp,
    ) -> Option<MessageOutcome> {
        let session = self.sessions.lookup(connection_id)?.clone();

        let message = ChatMessage::new(session.username, text, sent_at, session.room.clone());
        self.rooms.append_message(&session.room, message.clone());

        let members = self
            .rooms
            .get(&session.room)
            .map(|room| room.members().to_vec())
            .unwrap_or_default();

        Some(MessageOutcome { message, members })
    }

    /// Resolve the relay targets for a typing-state change: every member
    /// of the sender's room except the sender. `None` when the connection
    /// has no session. Typing state itself is never stored.
    pub fn typing(&self, connection_id: &ConnectionId) -> Option<TypingOutcome> {
        let session = self.sessions.lookup(connection_id)?;

        let others = self
            .rooms
            .get(&session.room)
            .map(|room| {
                room.members()
                    .iter()
                    .filter(|id| *id != connection_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Some(TypingOutcome {
            username: session.username.clone(),
            others,
        })
    }

    /// Remove a connection's session and its room membership.
    ///
    /// Returns `None` when the connection never joined; nothing to do
    /// then.
    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> Option<LeaveOutcome> {
        let session = self.sessions.remove(connection_id)?;

        self.rooms.remove_member(&session.room, connection_id);
        let remaining = self
            .rooms
            .get(&session.room)
            .map(|room| room.members().to_vec())
            .unwrap_or_default();
        let roster = self.rooms.snapshot_members(&session.room, &self.sessions);
        let room_emptied = remaining.is_empty();

        Some(LeaveOutcome {
            session,
            roster,
            remaining,
            room_emptied,
        })
    }

    /// Delete a room iff it is still empty. The emptiness re-check is what
    /// makes the deferred-deletion timer safe against rejoins during the
    /// grace window. Returns whether the room was deleted.
    pub fn delete_room_if_empty(&mut self, name: &RoomName) -> bool {
        if self.rooms.is_empty(name) {
            self.rooms.delete(name)
        } else {
            false
        }
    }

    /// Summaries of all live rooms, sorted by name for consistent output.
    pub fn room_summaries(&self) -> Vec<RoomSummary> {
        let mut summaries: Vec<RoomSummary> = self
            .rooms
            .iter()
            .map(|(name, room)| RoomSummary {
                name: name.clone(),
                user_count: room.members().len(),
                message_count: room.message_count(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        summaries
    }

    /// Detail view of one room, roster resolved through the registry.
    pub fn room_detail(&self, name: &RoomName) -> Option<RoomDetail> {
        let room = self.rooms.get(name)?;
        Some(RoomDetail {
            name: name.clone(),
            users: self.rooms.snapshot_members(name, &self.sessions),
            message_count: room.message_count(),
        })
    }
}
