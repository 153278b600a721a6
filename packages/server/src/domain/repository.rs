//! Repository contract for the lobby.
//!
//! The UseCase layer depends on this trait; the concrete storage lives in
//! the infrastructure layer (dependency inversion).

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use super::{Connection, ConnectionId, Lobby, LobbyError, Timestamp};

/// Errors raised by repository implementations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The lobby refused the connection
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// No outbound sender registered for the connection
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),
}

/// Data access for the lobby and the per-connection outbound senders
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// Snapshot of the lobby
    async fn get_lobby(&self) -> Lobby;

    /// Attach a connection together with its outbound frame sender
    async fn add_connection(
        &self,
        id: ConnectionId,
        sender: UnboundedSender<String>,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError>;

    /// Detach a connection and drop its sender
    async fn remove_connection(&self, id: &ConnectionId) -> Result<(), RepositoryError>;

    /// Connections currently attached
    async fn get_connections(&self) -> Vec<Connection>;

    /// Queue a frame for a connection
    async fn send_to(&self, id: &ConnectionId, frame: String) -> Result<(), RepositoryError>;
}
