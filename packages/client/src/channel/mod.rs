//! Messaging channel: the bidirectional event link to the peer group.
//!
//! Outbound events go through an [`EventSink`], fire-and-forget. Inbound
//! events are delivered in received order and routed through
//! [`Subscriptions`], one handler per event kind.

pub mod endpoint;
pub mod subscription;
pub mod websocket;

use std::fmt;

use murmur_shared::{ChannelEvent, ProtocolError};
use thiserror::Error;

pub use endpoint::resolve_endpoint;
pub use subscription::Subscriptions;
pub use websocket::{ChannelHandle, ChannelNotice, WebSocketChannel};

/// Errors raised by the channel
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Not connected right now; the event was dropped
    #[error("channel is disconnected")]
    Disconnected,

    /// The channel has been shut down for good
    #[error("channel is closed")]
    Closed,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Connection state of the channel, as shown on the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
        };
        f.write_str(label)
    }
}

/// Publishes outbound events. No acknowledgment, no retry.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    fn send(&self, event: ChannelEvent) -> Result<(), ChannelError>;
}
