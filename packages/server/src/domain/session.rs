//! Sessions: the server-side identity bound to one live connection.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use super::{RoomName, Timestamp};

/// Opaque identifier of one live transport connection. Owned by the
/// transport layer; the engine only ever compares and stores it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh connection id (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a user, generated at registration (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Generate a fresh user id (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A join request as received from a client, before defaulting.
///
/// The defaulting policy lives here rather than at the call sites: an
/// absent or blank username becomes `User_<first 8 hex chars of the user
/// id>`, an absent or blank room becomes `general`. Blank means empty
/// after trimming whitespace.
#[derive(Debug, Clone, Default)]
pub struct JoinRequest {
    pub username: Option<String>,
    pub room: Option<String>,
}

impl JoinRequest {
    pub fn new(username: Option<String>, room: Option<String>) -> Self {
        Self { username, room }
    }

    /// Default room for sessions that do not name one.
    pub const DEFAULT_ROOM: &str = "general";

    fn resolve_username(&self, user_id: &UserId) -> String {
        match &self.username {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("User_{}", &user_id.as_str()[..8]),
        }
    }

    fn resolve_room(&self) -> RoomName {
        match &self.room {
            Some(room) if !room.trim().is_empty() => RoomName::new(room.clone()),
            _ => RoomName::new(Self::DEFAULT_ROOM),
        }
    }
}

/// The identity bound to one live connection.
///
/// Created on join, never mutated (a session's room is fixed for its
/// lifetime; rejoining requires a new connection), destroyed on disconnect.
#[derive(Debug, Clone)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub username: String,
    pub room: RoomName,
    pub joined_at: Timestamp,
}

impl Session {
    /// Create a session from a join request, applying the defaulting policy.
    pub fn create(connection_id: ConnectionId, request: &JoinRequest, joined_at: Timestamp) -> Self {
        let user_id = UserId::generate();
        let username = request.resolve_username(&user_id);
        let room = request.resolve_room();
        Self {
            connection_id,
            user_id,
            username,
            room,
            joined_at,
        }
    }
}

/// Maps each live connection to its session.
///
/// Invariant: exactly one session per connected socket after a successful
/// join, none before.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ConnectionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session for a connection, applying the join request's
    /// defaulting policy. The caller must have checked that the connection
    /// has no live session.
    pub fn register(
        &mut self,
        connection_id: ConnectionId,
        request: &JoinRequest,
        joined_at: Timestamp,
    ) -> Session {
        let session = Session::create(connection_id.clone(), request, joined_at);
        self.sessions.insert(connection_id, session.clone());
        session
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> Option<&Session> {
        self.sessions.get(connection_id)
    }

    /// Delete and return the prior session, if any. Used at disconnect.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Session> {
        self.sessions.remove(connection_id)
    }
}
