//! Core domain models for the relay server.

use serde::{Deserialize, Serialize};

use super::{
    error::LobbyError,
    value_object::{ConnectionId, Timestamp},
};

/// Default maximum number of simultaneous connections in the lobby
pub const DEFAULT_LOBBY_CAPACITY: usize = 50;

/// The single lobby every peer joins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lobby {
    /// Connections currently attached to the lobby
    pub connections: Vec<Connection>,
    /// Timestamp when the lobby was opened
    pub created_at: Timestamp,
    /// Maximum number of connections allowed (default: 50)
    pub capacity: usize,
}

impl Lobby {
    /// Create a new empty lobby
    pub fn new(created_at: Timestamp) -> Self {
        Self::with_capacity(created_at, DEFAULT_LOBBY_CAPACITY)
    }

    /// Create a new empty lobby with a custom capacity
    pub fn with_capacity(created_at: Timestamp, capacity: usize) -> Self {
        Self {
            connections: Vec::new(),
            created_at,
            capacity,
        }
    }

    /// Attach a connection to the lobby
    ///
    /// # Errors
    ///
    /// Returns `LobbyError::CapacityExceeded` if the lobby is full and
    /// `LobbyError::DuplicateConnection` if the id is already attached.
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), LobbyError> {
        if self.get_connection(&connection.id).is_some() {
            return Err(LobbyError::DuplicateConnection(
                connection.id.into_string(),
            ));
        }
        if self.connections.len() >= self.capacity {
            return Err(LobbyError::CapacityExceeded {
                capacity: self.capacity,
                current: self.connections.len(),
            });
        }
        self.connections.push(connection);
        Ok(())
    }

    /// Detach a connection by ID. Returns whether it was attached.
    pub fn remove_connection(&mut self, id: &ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| &c.id != id);
        before != self.connections.len()
    }

    /// Get a connection by ID
    pub fn get_connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.id == id)
    }
}

/// A peer connection attached to the lobby
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Server-assigned connection identifier
    pub id: ConnectionId,
    /// Timestamp when the connection was accepted
    pub connected_at: Timestamp,
}

impl Connection {
    /// Create a new connection
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self { id, connected_at }
    }
}
