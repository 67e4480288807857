//! Shared fixtures for use case tests.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    domain::{
        ConnectionId, ConnectionRepository, MessagePushError, MessagePusher, PusherChannel,
        ServerEvent, Timestamp,
    },
    infrastructure::{
        dto::websocket::ServerEventDto, message_pusher::WebSocketMessagePusher,
        repository::InMemoryConnectionRepository,
    },
};

use super::PresencePublisher;

pub(crate) struct Harness {
    pub repository: Arc<InMemoryConnectionRepository>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
    pub publisher: Arc<PresencePublisher>,
}

impl Harness {
    pub fn new() -> Self {
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        Self::with_pusher(message_pusher.clone(), message_pusher)
    }

    /// Same registry and queues, but every publish goes through `dispatcher`.
    pub fn with_pusher(
        message_pusher: Arc<WebSocketMessagePusher>,
        dispatcher: Arc<dyn MessagePusher>,
    ) -> Self {
        let repository = Arc::new(InMemoryConnectionRepository::new());
        let publisher = Arc::new(PresencePublisher::new(repository.clone(), dispatcher));
        Self {
            repository,
            message_pusher,
            publisher,
        }
    }

    /// Register a connection in both the registry and the pusher.
    pub async fn connect(&self, value: &str) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.repository.register(id(value), Timestamp::new(1000)).await;
        self.message_pusher.register_client(id(value), tx).await;
        rx
    }
}

/// Delays the first `broadcast` before delegating, so a concurrent publish can overtake it.
pub(crate) struct SlowFirstBroadcast {
    inner: Arc<WebSocketMessagePusher>,
    delay: Duration,
    delayed: AtomicBool,
}

impl SlowFirstBroadcast {
    pub fn new(inner: Arc<WebSocketMessagePusher>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            delayed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl MessagePusher for SlowFirstBroadcast {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.inner.register_client(connection_id, sender).await;
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.inner.unregister_client(connection_id).await;
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        self.inner.push_to(connection_id, event).await
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        if !self.delayed.swap(true, Ordering::SeqCst) {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.broadcast(targets, event).await
    }
}

pub(crate) fn id(value: &str) -> ConnectionId {
    ConnectionId::new(value.to_string()).unwrap()
}

/// Decode every frame currently queued for a connection.
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<ServerEventDto> {
    let mut events = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        events.push(serde_json::from_str(&frame).expect("frame should decode"));
    }
    events
}

/// Member ids of a `presence:update` frame.
pub(crate) fn presence_ids(event: &ServerEventDto) -> Vec<String> {
    match event {
        ServerEventDto::PresenceUpdate(entries) => entries.iter().map(|e| e.id.clone()).collect(),
        other => panic!("expected presence:update, got {other:?}"),
    }
}
