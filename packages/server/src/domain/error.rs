//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// ConnectionId invalid format error (not a valid UUID format)
    #[error("ConnectionId must be a valid UUID format (got: {0})")]
    ConnectionIdInvalidFormat(String),
}

/// Errors related to Lobby domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LobbyError {
    /// Lobby capacity exceeded error
    #[error("Lobby capacity exceeded: maximum {capacity} connections allowed (current: {current})")]
    CapacityExceeded { capacity: usize, current: usize },

    /// The same connection registered twice
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),
}
