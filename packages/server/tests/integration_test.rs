//! End-to-end tests: the full join/message/typing/leave protocol over real
//! WebSockets against an in-process server.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use irori_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryChatRepository},
    ui::{AppState, Server},
    usecase::{
        DisconnectUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, RoomCleanup,
        SendMessageUseCase, UpdateTypingUseCase,
    },
};
use irori_shared::time::SystemClock;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Serve the chat app on an ephemeral port and return its ws:// URL.
async fn spawn_server() -> String {
    let repository = Arc::new(InMemoryChatRepository::new());
    let pusher = Arc::new(WebSocketMessagePusher::new());
    let cleanup = Arc::new(RoomCleanup::new(
        repository.clone(),
        Duration::from_secs(300),
    ));
    let clock = Arc::new(SystemClock);

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

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Server::new(state).router();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("ws://{}/ws", addr)
}

async fn connect(url: &str) -> WsClient {
    let (client, _response) = connect_async(url).await.expect("failed to connect");
    client
}

async fn send_event(client: &mut WsClient, event: Value) {
    client
        .send(Message::Text(event.to_string().into()))
        .await
        .expect("failed to send event");
}

/// Next text frame, parsed; panics after five seconds of silence.
async fn recv_event(client: &mut WsClient) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for an event")
            .expect("connection closed")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("invalid JSON frame");
        }
    }
}

#[tokio::test]
async fn chat_scenario_round_trip() {
    let url = spawn_server().await;

    // alice joins the empty room "x"
    let mut alice = connect(&url).await;
    send_event(&mut alice, json!({"type": "join", "username": "alice", "room": "x"})).await;

    let joined = recv_event(&mut alice).await;
    assert_eq!(joined["type"], "joinedRoom");
    assert_eq!(joined["room"], "x");
    assert_eq!(joined["username"], "alice");
    assert_eq!(joined["messages"], json!([]));

    let roster = recv_event(&mut alice).await;
    assert_eq!(roster["type"], "roomUsers");
    assert_eq!(roster["users"].as_array().unwrap().len(), 1);
    assert_eq!(roster["users"][0]["username"], "alice");

    // bob joins the same room
    let mut bob = connect(&url).await;
    send_event(&mut bob, json!({"type": "join", "username": "bob", "room": "x"})).await;

    let joined = recv_event(&mut bob).await;
    assert_eq!(joined["type"], "joinedRoom");
    assert_eq!(joined["messages"], json!([]));

    let roster = recv_event(&mut bob).await;
    assert_eq!(roster["type"], "roomUsers");
    assert_eq!(roster["users"].as_array().unwrap().len(), 2);

    // alice sees the join notice, then the refreshed roster; never her own
    let notice = recv_event(&mut alice).await;
    assert_eq!(notice["type"], "userJoined");
    assert_eq!(notice["username"], "bob");
    assert!(notice["timestamp"].is_string());

    let roster = recv_event(&mut alice).await;
    assert_eq!(roster["type"], "roomUsers");
    assert_eq!(roster["users"].as_array().unwrap().len(), 2);

    // alice posts; both members receive the broadcast, sender included
    send_event(&mut alice, json!({"type": "message", "text": "hi"})).await;

    for client in [&mut alice, &mut bob] {
        let message = recv_event(client).await;
        assert_eq!(message["type"], "message");
        assert_eq!(message["username"], "alice");
        assert_eq!(message["text"], "hi");
        assert_eq!(message["room"], "x");
        assert!(message["id"].is_string());
        assert!(message["timestamp"].is_string());
    }

    // bob starts typing; alice is notified, bob is not
    send_event(&mut bob, json!({"type": "typing", "isTyping": true})).await;

    let typing = recv_event(&mut alice).await;
    assert_eq!(typing["type"], "userTyping");
    assert_eq!(typing["username"], "bob");
    assert_eq!(typing["isTyping"], true);

    // a follow-up message is the next thing bob sees, proving the typing
    // notice was never echoed to him
    send_event(&mut alice, json!({"type": "message", "text": "still there?"})).await;
    let next = recv_event(&mut bob).await;
    assert_eq!(next["type"], "message");
    assert_eq!(next["text"], "still there?");
    let next = recv_event(&mut alice).await;
    assert_eq!(next["type"], "message");

    // bob disconnects; alice sees the leave notice and a shrunken roster
    bob.close(None).await.unwrap();

    let left = recv_event(&mut alice).await;
    assert_eq!(left["type"], "userLeft");
    assert_eq!(left["username"], "bob");

    let roster = recv_event(&mut alice).await;
    assert_eq!(roster["type"], "roomUsers");
    assert_eq!(roster["users"].as_array().unwrap().len(), 1);
    assert_eq!(roster["users"][0]["username"], "alice");

    // a late joiner receives the room's backlog
    let mut carol = connect(&url).await;
    send_event(&mut carol, json!({"type": "join", "username": "carol", "room": "x"})).await;

    let joined = recv_event(&mut carol).await;
    assert_eq!(joined["type"], "joinedRoom");
    let backlog = joined["messages"].as_array().unwrap();
    assert_eq!(backlog.len(), 2);
    assert_eq!(backlog[0]["text"], "hi");
    assert_eq!(backlog[1]["text"], "still there?");
}

#[tokio::test]
async fn events_before_join_are_dropped() {
    let url = spawn_server().await;

    // a client speaks before joining; both events must vanish silently
    let mut client = connect(&url).await;
    send_event(&mut client, json!({"type": "message", "text": "anyone?"})).await;
    send_event(&mut client, json!({"type": "typing", "isTyping": true})).await;

    // the join still works and shows an empty room
    send_event(&mut client, json!({"type": "join", "username": "alice", "room": "x"})).await;

    let joined = recv_event(&mut client).await;
    assert_eq!(joined["type"], "joinedRoom");
    assert_eq!(joined["messages"], json!([]));
}

#[tokio::test]
async fn defaults_apply_to_blank_join_requests() {
    let url = spawn_server().await;

    let mut client = connect(&url).await;
    send_event(&mut client, json!({"type": "join"})).await;

    let joined = recv_event(&mut client).await;
    assert_eq!(joined["type"], "joinedRoom");
    assert_eq!(joined["room"], "general");
    let username = joined["username"].as_str().unwrap();
    assert!(username.starts_with("User_"));
    assert_eq!(username.len(), "User_".len() + 8);
}

#[tokio::test]
async fn unparseable_frames_do_not_kill_the_connection() {
    let url = spawn_server().await;

    let mut client = connect(&url).await;
    client
        .send(Message::Text("not json at all".into()))
        .await
        .unwrap();
    send_event(&mut client, json!({"type": "join", "username": "alice", "room": "x"})).await;

    let joined = recv_event(&mut client).await;
    assert_eq!(joined["type"], "joinedRoom");
}

#[tokio::test]
async fn rooms_are_isolated_from_each_other() {
    let url = spawn_server().await;

    let mut alice = connect(&url).await;
    send_event(&mut alice, json!({"type": "join", "username": "alice", "room": "x"})).await;
    recv_event(&mut alice).await; // joinedRoom
    recv_event(&mut alice).await; // roomUsers

    let mut bob = connect(&url).await;
    send_event(&mut bob, json!({"type": "join", "username": "bob", "room": "y"})).await;
    recv_event(&mut bob).await; // joinedRoom
    recv_event(&mut bob).await; // roomUsers

    // bob posts in "y"; alice in "x" must not see it
    send_event(&mut bob, json!({"type": "message", "text": "only y"})).await;
    let message = recv_event(&mut bob).await;
    assert_eq!(message["text"], "only y");

    // alice's next event is her own post, not bob's
    send_event(&mut alice, json!({"type": "message", "text": "only x"})).await;
    let message = recv_event(&mut alice).await;
    assert_eq!(message["text"], "only x");
}
