//! Room-scoped WebSocket chat server.
//!
//! Clients join a named room, exchange messages, and see presence and
//! typing updates in real time. Each room keeps a bounded in-memory
//! backlog that late joiners receive on entry.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;

use irori_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryChatRepository},
    ui::{AppState, Server},
    usecase::{
        DEFAULT_GRACE_PERIOD, DisconnectUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        JoinRoomUseCase, RoomCleanup, SendMessageUseCase, UpdateTypingUseCase,
    },
};
use irori_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Room-scoped WebSocket chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds an empty room survives before its history is dropped
    #[arg(long, default_value_t = DEFAULT_GRACE_PERIOD.as_secs())]
    grace_period_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Room cleanup scheduler
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory engine state behind one lock)
    let repository = Arc::new(InMemoryChatRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create the deferred room-deletion scheduler
    let cleanup = Arc::new(RoomCleanup::new(
        repository.clone(),
        Duration::from_secs(args.grace_period_secs),
    ));

    let clock = Arc::new(SystemClock);

    // 4. Create UseCases
    let state = Arc::new(AppState {
        join_room_usecase: Arc::new(JoinRoomUseCase::new(
            repository.clone(),
            pusher.clone(),
            cleanup.clone(),
            clock.clone(),
        )),
        send_message_usecase: Arc::new(SendMessageUseCase::new(
            repository.clone(),
            pusher.clone(),
            clock.clone(),
        )),
        update_typing_usecase: Arc::new(UpdateTypingUseCase::new(
            repository.clone(),
            pusher.clone(),
        )),
        disconnect_usecase: Arc::new(DisconnectUseCase::new(
            repository.clone(),
            pusher.clone(),
            cleanup.clone(),
            clock.clone(),
        )),
        get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
        get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository.clone())),
        pusher: pusher.clone(),
    });

    // 5. Create and run the server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}
