//! Wire protocol spoken between Murmur clients and the relay server.
//!
//! Every WebSocket text frame carries one JSON envelope:
//!
//! ```text
//! {"event": "chat",   "data": {"usuario": "alice", "mensaje": "hola"}}
//! {"event": "typing", "data": {"nombre": "alice", "texto": "hol"}}
//! ```
//!
//! The payload field names are kept as-is for compatibility with existing peers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while encoding or decoding a frame
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not a well-formed envelope (bad JSON, unknown event, missing fields)
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The kinds of events carried by the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Chat,
    Typing,
}

impl EventKind {
    /// Wire name of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Chat => "chat",
            EventKind::Typing => "typing",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `chat` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    /// Sender display name
    pub usuario: String,
    /// Message body
    pub mensaje: String,
}

/// `typing` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingPayload {
    /// Display name of the peer typing
    pub nombre: String,
    /// Current draft; empty means the peer stopped typing
    pub texto: String,
}

/// A single event on the channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ChannelEvent {
    Chat(ChatPayload),
    Typing(TypingPayload),
}

impl ChannelEvent {
    /// Kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            ChannelEvent::Chat(_) => EventKind::Chat,
            ChannelEvent::Typing(_) => EventKind::Typing,
        }
    }

    /// Encode into a JSON text frame
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON text frame
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(frame)?)
    }
}
