//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use murmur_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    infrastructure::dto::http::{ConnectionDto, LobbyDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the lobby with its current connections
pub async fn get_lobby(State(state): State<Arc<AppState>>) -> Json<LobbyDto> {
    let lobby = state.repository.get_lobby().await;

    Json(LobbyDto {
        connection_count: lobby.connections.len(),
        capacity: lobby.capacity,
        connections: lobby
            .connections
            .iter()
            .map(|c| ConnectionDto {
                id: c.id.as_str().to_string(),
                connected_at: timestamp_to_jst_rfc3339(c.connected_at.value()),
            })
            .collect(),
        created_at: timestamp_to_jst_rfc3339(lobby.created_at.value()),
    })
}
