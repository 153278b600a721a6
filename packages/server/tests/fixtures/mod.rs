//! Test fixtures: an in-process relay server bound to an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;

use tokio::{net::TcpListener, sync::oneshot};

/// Relay server running on a background task; shut down on drop.
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a server with the given lobby capacity.
    pub async fn start_with_capacity(capacity: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = murmur_server::serve(listener, capacity, shutdown).await {
                panic!("Test server failed: {e}");
            }
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Start a server with the default capacity.
    pub async fn start() -> Self {
        Self::start_with_capacity(murmur_server::domain::entity::DEFAULT_LOBBY_CAPACITY).await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
