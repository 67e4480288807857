//! Data Transfer Objects (DTOs) for the signaling relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: event-channel frames (inbound decoding, outbound encoding)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
