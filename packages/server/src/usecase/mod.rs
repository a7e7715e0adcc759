//! Use cases: one per inbound event, orchestrating the repository and the
//! pusher, plus the deferred room-cleanup scheduler.

mod disconnect;
mod get_rooms;
mod join_room;
mod room_cleanup;
mod send_message;
mod update_typing;

pub use disconnect::DisconnectUseCase;
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_room::JoinRoomUseCase;
pub use room_cleanup::{DEFAULT_GRACE_PERIOD, RoomCleanup};
pub use send_message::SendMessageUseCase;
pub use update_typing::UpdateTypingUseCase;
