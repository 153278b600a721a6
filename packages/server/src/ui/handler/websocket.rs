//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use murmur_shared::ChannelEvent;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory},
    ui::state::AppState,
    usecase::{
        ConnectError, ConnectParticipantUseCase, DisconnectParticipantUseCase, RelayEventUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    let connection_id = ConnectionIdFactory::generate();

    // Create a channel for this connection to receive relayed frames
    let (tx, rx) = mpsc::unbounded_channel();

    let connect_usecase = ConnectParticipantUseCase::new(state.repository.clone());
    match connect_usecase.execute(connection_id.clone(), tx).await {
        Ok(connected_at) => {
            tracing::info!(
                "Connection '{}' registered at {}",
                connection_id,
                connected_at
            );
            let failed_state = state.clone();
            let failed_id = connection_id.clone();
            Ok(ws
                .on_failed_upgrade(move |e| {
                    tracing::warn!("Upgrade of '{}' failed: {}", failed_id, e);
                    tokio::spawn(async move {
                        release_connection(&failed_state, &failed_id).await;
                    });
                })
                .on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx)))
        }
        Err(ConnectError::DuplicateConnection(id)) => {
            tracing::warn!("Connection '{}' is already registered. Rejecting.", id);
            Err(StatusCode::CONFLICT)
        }
        Err(ConnectError::LobbyCapacityExceeded) => {
            tracing::warn!("Lobby capacity exceeded. Rejecting '{}'", connection_id);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    let recv_id = connection_id.clone();
    let recv_state = state.clone();

    // Spawn a task to receive frames from this connection and relay them
    let mut recv_task = tokio::spawn(async move {
        let relay_usecase = RelayEventUseCase::new(recv_state.repository.clone());

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", recv_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match ChannelEvent::decode(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!("Dropping frame from '{}': {}", recv_id, e);
                            continue;
                        }
                    };
                    tracing::debug!("Relaying {} from '{}'", event.kind(), recv_id);

                    let report = relay_usecase.execute(&recv_id, &event, &text).await;
                    tracing::debug!(
                        "Relayed {} from '{}' to {} connection(s) ({} failed)",
                        event.kind(),
                        recv_id,
                        report.delivered.len(),
                        report.failed.len()
                    );
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward relayed frames to this connection
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    release_connection(&state, &connection_id).await;
}

/// Give the lobby slot of a connection back; also used when the upgrade never completes.
async fn release_connection(state: &AppState, connection_id: &ConnectionId) {
    let disconnect_usecase = DisconnectParticipantUseCase::new(state.repository.clone());
    match disconnect_usecase.execute(connection_id).await {
        Ok(()) => tracing::info!("Connection '{}' closed and removed", connection_id),
        Err(e) => tracing::warn!("Failed to remove connection '{}': {}", connection_id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Lobby, LobbyRepository, Timestamp},
        infrastructure::repository::InMemoryLobbyRepository,
    };

    #[tokio::test]
    async fn test_release_connection_frees_the_slot() {
        // テスト項目: アップグレード前に登録された接続を解放すると、枠が再利用できる
        // given (前提条件):
        let repository =
            InMemoryLobbyRepository::shared(Lobby::with_capacity(Timestamp::new(0), 1));
        let state = AppState {
            repository: repository.clone(),
        };
        let connect = ConnectParticipantUseCase::new(repository.clone());
        let id = ConnectionIdFactory::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        connect.execute(id.clone(), tx).await.unwrap();

        // when (操作):
        release_connection(&state, &id).await;

        // then (期待する結果):
        assert!(repository.get_connections().await.is_empty());
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(
            connect
                .execute(ConnectionIdFactory::generate(), tx)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_release_connection_twice_is_harmless() {
        // テスト項目: 既に解放済みの接続を再度解放してもパニックしない
        // given (前提条件):
        let repository = InMemoryLobbyRepository::shared(Lobby::new(Timestamp::new(0)));
        let state = AppState {
            repository: repository.clone(),
        };
        let id = ConnectionIdFactory::generate();

        // when (操作):
        release_connection(&state, &id).await;
        release_connection(&state, &id).await;

        // then (期待する結果):
        assert!(repository.get_connections().await.is_empty());
    }
}
