//! Shared application state for the axum handlers.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::usecase::{
    DisconnectUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, SendMessageUseCase,
    UpdateTypingUseCase,
};

/// Shared application state
pub struct AppState {
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub update_typing_usecase: Arc<UpdateTypingUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// The pusher the websocket handler attaches new connections to.
    pub pusher: Arc<dyn MessagePusher>,
}
