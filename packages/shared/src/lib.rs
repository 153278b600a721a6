//! Shared building blocks for Murmur.
//!
//! The client and the relay server agree on the wire protocol defined here,
//! and both binaries set up logging through [`logger`].

pub mod logger;
pub mod protocol;
pub mod time;

pub use protocol::{ChannelEvent, ChatPayload, EventKind, ProtocolError, TypingPayload};
