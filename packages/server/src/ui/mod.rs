//! Signaling relay server: axum router, WebSocket lifecycle and HTTP handlers.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerConfig, build_router};
pub use state::AppState;
