//! WebRTC signaling and presence relay.
//!
//! This library tracks connected peers, groups them into rooms, relays WebRTC
//! negotiation payloads and private chat messages between specific peers, and
//! broadcasts room-scoped presence to every member of a room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
