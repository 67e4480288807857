//! Request handlers.

mod http;
mod websocket;

pub use http::{get_hostname, get_presence, get_rooms, health_check};
pub use websocket::websocket_handler;
