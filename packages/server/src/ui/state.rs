//! Server state shared by every handler.

use std::sync::Arc;

use tsunagi_shared::time::Clock;

use crate::{
    domain::{ConnectionRepository, MessagePusher},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryConnectionRepository,
    },
    usecase::{
        ConnectConnectionUseCase, DisconnectConnectionUseCase, GetPresenceUseCase,
        GetRoomsUseCase, HeartbeatUseCase, IdentifyUseCase, JoinRoomUseCase, PresencePublisher,
        RelaySignalUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectConnectionUseCase（接続）
    pub connect_usecase: Arc<ConnectConnectionUseCase>,
    /// DisconnectConnectionUseCase（切断）
    pub disconnect_usecase: Arc<DisconnectConnectionUseCase>,
    /// IdentifyUseCase（identify）
    pub identify_usecase: Arc<IdentifyUseCase>,
    /// JoinRoomUseCase（room:join）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// HeartbeatUseCase（heartbeat:ping / heartbeat:latency）
    pub heartbeat_usecase: Arc<HeartbeatUseCase>,
    /// RelaySignalUseCase（webrtc:* / chat:private）
    pub relay_usecase: Arc<RelaySignalUseCase>,
    /// GetPresenceUseCase（GET /presence）
    pub get_presence_usecase: Arc<GetPresenceUseCase>,
    /// GetRoomsUseCase（GET /api/rooms）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// Host name reported by `GET /hostname`
    pub hostname: String,
}

impl AppState {
    /// Wire every use case around one registry and one dispatcher.
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        hostname: String,
    ) -> Self {
        let publisher = Arc::new(PresencePublisher::new(
            repository.clone(),
            message_pusher.clone(),
        ));

        Self {
            connect_usecase: Arc::new(ConnectConnectionUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            disconnect_usecase: Arc::new(DisconnectConnectionUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                publisher.clone(),
            )),
            identify_usecase: Arc::new(IdentifyUseCase::new(
                repository.clone(),
                publisher.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                publisher.clone(),
            )),
            heartbeat_usecase: Arc::new(HeartbeatUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                publisher,
                clock.clone(),
            )),
            relay_usecase: Arc::new(RelaySignalUseCase::new(message_pusher, clock)),
            get_presence_usecase: Arc::new(GetPresenceUseCase::new(repository.clone())),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository)),
            hostname,
        }
    }

    /// State backed by the in-process registry and WebSocket dispatcher.
    pub fn in_memory(clock: Arc<dyn Clock>, hostname: String) -> Self {
        Self::new(
            Arc::new(InMemoryConnectionRepository::new()),
            Arc::new(WebSocketMessagePusher::new()),
            clock,
            hostname,
        )
    }
}
