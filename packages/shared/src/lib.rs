//! Utilities shared by the Tsunagi binaries and libraries.

pub mod logger;
pub mod time;
