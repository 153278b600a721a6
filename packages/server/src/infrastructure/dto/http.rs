//! HTTP API response DTOs for the relay server.

use serde::{Deserialize, Serialize};

/// Lobby summary for the lobby endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyDto {
    pub connection_count: usize,
    pub capacity: usize,
    pub connections: Vec<ConnectionDto>,
    pub created_at: String, // ISO 8601
}

/// Connection detail for the lobby endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDto {
    pub id: String,
    pub connected_at: String, // ISO 8601
}
