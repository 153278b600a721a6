//! UseCase layer error definitions.

use thiserror::Error;

/// Connection refused by the lobby
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),

    #[error("Lobby capacity exceeded")]
    LobbyCapacityExceeded,
}

/// Disconnect of an unknown connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisconnectError {
    #[error("Connection '{0}' is not registered")]
    ConnectionNotFound(String),
}
