//! Domain layer: connection model, room derivation and the ports used by the
//! use cases.
//!
//! The domain layer owns no I/O. Storage and delivery are reached through the
//! [`ConnectionRepository`] and [`MessagePusher`] traits, which the
//! infrastructure layer implements.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod room_index;
pub mod value_object;

pub use entity::{Connection, ConnectionPatch};
pub use error::{MessagePushError, ValueObjectError};
pub use event::{ServerEvent, SignalKind};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::ConnectionRepository;
pub use value_object::{ConnectionId, ConnectionIdFactory, Role, RoomId, Timestamp};
