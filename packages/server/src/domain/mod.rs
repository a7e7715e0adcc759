//! Domain layer: entities, value objects, the pure state machine of the
//! chat engine, and the trait seams the outer layers implement.

mod chat;
mod events;
mod message;
mod pusher;
mod repository;
mod room;
mod session;

pub use chat::{
    ChatState, JoinError, JoinOutcome, LeaveOutcome, MessageOutcome, RoomDetail, RoomSummary,
    TypingOutcome,
};
pub use events::{MessagePayload, RoomUser, ServerEvent};
pub use message::{ChatMessage, MessageId, Timestamp};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::ChatRepository;
pub use room::{MESSAGE_HISTORY_LIMIT, Room, RoomMember, RoomName, RoomStore};
pub use session::{ConnectionId, JoinRequest, Session, SessionRegistry, UserId};

#[cfg(test)]
pub use pusher::MockMessagePusher;
