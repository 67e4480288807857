//! UseCase layer: one type per inbound operation.
//!
//! Use cases depend only on the domain ports (`ConnectionRepository`,
//! `MessagePusher`) and are shared by the UI layer through `Arc`.

mod connect_connection;
mod disconnect_connection;
mod error;
mod get_presence;
mod get_rooms;
mod heartbeat;
mod identify;
mod join_room;
mod publish_presence;
mod relay_signal;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_connection::ConnectConnectionUseCase;
pub use disconnect_connection::DisconnectConnectionUseCase;
pub use error::RelayError;
pub use get_presence::GetPresenceUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use heartbeat::HeartbeatUseCase;
pub use identify::IdentifyUseCase;
pub use join_room::JoinRoomUseCase;
pub use publish_presence::PresencePublisher;
pub use relay_signal::RelaySignalUseCase;
