//! Router construction and server lifecycle.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use murmur_shared::time::get_jst_timestamp;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::{Lobby, Timestamp, entity::DEFAULT_LOBBY_CAPACITY},
    infrastructure::repository::InMemoryLobbyRepository,
};

use super::{handler, signal::shutdown_signal, state::AppState};

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,
    /// Maximum simultaneous connections
    pub capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 4000)),
            capacity: DEFAULT_LOBBY_CAPACITY,
        }
    }
}

/// Build the application router
fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(handler::websocket_handler))
        .route("/api/health", get(handler::health_check))
        .route("/api/lobby", get(handler::get_lobby))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C / SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.addr,
            source,
        })?;
    serve(listener, config.capacity, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    capacity: usize,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let lobby = Lobby::with_capacity(Timestamp::new(get_jst_timestamp()), capacity);
    let state = Arc::new(AppState {
        repository: InMemoryLobbyRepository::shared(lobby),
    });

    let app = build_router(state);

    tracing::info!(
        "Relay listening on {} (capacity: {})",
        listener.local_addr()?,
        capacity
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("Relay stopped");
    Ok(())
}
