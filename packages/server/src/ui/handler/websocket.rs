//! WebSocket connection handlers.
//!
//! Each connection runs two tasks: one reads and dispatches inbound events in
//! order, the other drains the connection's outbound queue into the socket.
//! When either finishes the connection is torn down exactly once, after any
//! event already being dispatched has run to completion.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{Stream, StreamExt},
};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tsunagi_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, Role, RoomId, SignalKind},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::RelayError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionIdFactory::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Outbound queue of this connection
/// * `sender` - WebSocket sink to send frames to this connection
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, receiver) = socket.split();

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connect_usecase
        .execute(connection_id.clone(), tx)
        .await;
    tracing::info!("Connection '{}' connected and registered", connection_id);

    let mut send_task = pusher_loop(rx, sender);

    let shutdown = CancellationToken::new();
    let mut recv_task = tokio::spawn(receive_loop(
        receiver,
        state.clone(),
        connection_id.clone(),
        shutdown.clone(),
    ));

    // If the reader finishes, abort the writer. If the writer finishes, let the
    // reader complete the event it is dispatching before tearing down.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            shutdown.cancel();
            if let Err(e) = (&mut recv_task).await {
                tracing::error!("Receive task for '{}' failed: {}", connection_id, e);
            }
        }
    };

    match state.disconnect_usecase.execute(&connection_id).await {
        Some(removed) => {
            tracing::info!(
                "Connection '{}' disconnected from room '{}' (last heartbeat {}), {} remaining",
                connection_id,
                removed.room_id,
                timestamp_to_rfc3339(removed.last_heartbeat_at.value())
                    .unwrap_or_else(|| removed.last_heartbeat_at.value().to_string()),
                state.disconnect_usecase.count_remaining_connections().await
            );
        }
        None => {
            tracing::warn!("Connection '{}' was already removed", connection_id);
        }
    }
}

/// Reads frames in order and dispatches each one to completion.
///
/// `shutdown` is only observed while waiting for the next frame.
async fn receive_loop<S>(
    mut receiver: S,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    shutdown: CancellationToken,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let msg = tokio::select! {
            () = shutdown.cancelled() => {
                tracing::debug!("Receive loop for '{}' cancelled", connection_id);
                break;
            }
            msg = receiver.next() => msg,
        };

        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => match ClientEvent::decode(text.as_str()) {
                Ok(event) => dispatch_event(&state, &connection_id, event).await,
                Err(e) => {
                    tracing::warn!("Dropping frame from '{}': {}", connection_id, e);
                }
            },
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            _ => {}
        }
    }
}

/// Route one decoded event to its use case.
async fn dispatch_event(state: &AppState, connection_id: &ConnectionId, event: ClientEvent) {
    tracing::debug!("Received '{}' from '{}'", event.name(), connection_id);

    match event {
        ClientEvent::Identify(payload) => {
            state
                .identify_usecase
                .execute(
                    connection_id,
                    Role::from_optional(payload.role),
                    payload.hostname,
                    RoomId::from_optional(payload.room_id),
                )
                .await;
        }
        ClientEvent::JoinRoom(room_id) => {
            state
                .join_room_usecase
                .execute(connection_id, RoomId::from_optional(room_id))
                .await;
        }
        ClientEvent::HeartbeatPing(client_timestamp) => {
            if let Err(e) = state
                .heartbeat_usecase
                .ping(connection_id, client_timestamp)
                .await
            {
                tracing::warn!("Failed to send heartbeat:pong to '{}': {}", connection_id, e);
            }
        }
        ClientEvent::HeartbeatLatency(latency_ms) => {
            state
                .heartbeat_usecase
                .report_latency(connection_id, latency_ms)
                .await;
        }
        ClientEvent::WebRtcOffer(payload) => {
            relay_signal(
                state,
                connection_id,
                SignalKind::Offer,
                payload.to_connection_id,
                payload.sdp,
                payload.room_id,
            )
            .await;
        }
        ClientEvent::WebRtcAnswer(payload) => {
            relay_signal(
                state,
                connection_id,
                SignalKind::Answer,
                payload.to_connection_id,
                payload.sdp,
                payload.room_id,
            )
            .await;
        }
        ClientEvent::IceCandidate(payload) => {
            relay_signal(
                state,
                connection_id,
                SignalKind::IceCandidate,
                payload.to_connection_id,
                payload.candidate,
                payload.room_id,
            )
            .await;
        }
        ClientEvent::ChatPrivate(payload) => {
            let Some(to) = parse_target(connection_id, payload.to_connection_id) else {
                return;
            };
            let result = state
                .relay_usecase
                .relay_private_chat(connection_id.clone(), &to, payload.message)
                .await;
            log_relay_result("chat:private", connection_id, result);
        }
    }
}

async fn relay_signal(
    state: &AppState,
    connection_id: &ConnectionId,
    kind: SignalKind,
    to_connection_id: String,
    body: Value,
    room_id: Option<String>,
) {
    let Some(to) = parse_target(connection_id, to_connection_id) else {
        return;
    };
    let result = state
        .relay_usecase
        .relay_signal(
            kind,
            connection_id.clone(),
            &to,
            body,
            RoomId::from_optional(room_id),
        )
        .await;
    log_relay_result(kind.event_name(), connection_id, result);
}

fn parse_target(connection_id: &ConnectionId, to_connection_id: String) -> Option<ConnectionId> {
    match ConnectionId::try_from(to_connection_id) {
        Ok(to) => Some(to),
        Err(e) => {
            tracing::warn!("Dropping relay from '{}': invalid target: {}", connection_id, e);
            None
        }
    }
}

// Relay failures are never reported back to the sender.
fn log_relay_result(event: &str, from: &ConnectionId, result: Result<(), RelayError>) {
    match result {
        Ok(()) => {}
        Err(RelayError::TargetUnreachable(to)) => {
            tracing::debug!("Dropped '{}' from '{}': target '{}' is gone", event, from, to);
        }
        Err(e) => {
            tracing::warn!("Failed to relay '{}' from '{}': {}", event, from, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::stream;
    use tsunagi_shared::time::FixedClock;

    use super::*;
    use crate::{
        domain::{ConnectionRepository, MessagePusher},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRepository,
        },
        usecase::test_support::{SlowFirstBroadcast, drain, id, presence_ids},
    };

    #[tokio::test]
    async fn test_cancel_waits_for_dispatch_in_progress() {
        // テスト項目: ディスパッチ中に切断が始まっても、room:join は前のルームへの配信まで完了する
        // given (前提条件): 最初の broadcast が 50ms 遅れ、alice と bob が "default" にいる
        let repository = Arc::new(InMemoryConnectionRepository::new());
        let inner = Arc::new(WebSocketMessagePusher::new());
        let slow: Arc<dyn MessagePusher> = Arc::new(SlowFirstBroadcast::new(
            inner,
            Duration::from_millis(50),
        ));
        let state = Arc::new(AppState::new(
            repository.clone(),
            slow,
            Arc::new(FixedClock::new(1000)),
            "test-host".to_string(),
        ));
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        let (tx_bob, mut rx_bob) = mpsc::unbounded_channel();
        state.connect_usecase.execute(id("alice"), tx_alice).await;
        state.connect_usecase.execute(id("bob"), tx_bob).await;
        drain(&mut rx_alice);
        drain(&mut rx_bob);

        let frames = stream::iter(vec![Ok(Message::Text(
            r#"{"type":"room:join","payload":"r2"}"#.into(),
        ))])
        .chain(stream::pending());
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(receive_loop(
            frames,
            state.clone(),
            id("alice"),
            shutdown.clone(),
        ));

        // when (操作): r2 への配信が遅れている間にキャンセルする
        tokio::time::sleep(Duration::from_millis(10)).await;
        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("receive loop should stop after cancel")
            .unwrap();

        // then (期待する結果):
        let alice_events = drain(&mut rx_alice);
        assert_eq!(alice_events.len(), 1);
        assert_eq!(presence_ids(&alice_events[0]), vec!["alice"]);
        let bob_events = drain(&mut rx_bob);
        assert_eq!(bob_events.len(), 1);
        assert_eq!(presence_ids(&bob_events[0]), vec!["bob"]);
        let default_room = repository.snapshot_by_room(&RoomId::default()).await;
        assert_eq!(default_room.len(), 1);
    }
}
