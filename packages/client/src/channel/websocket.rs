//! WebSocket transport for the messaging channel.
//!
//! One background task owns the socket: it forwards outbound events,
//! decodes inbound frames in received order, and reconnects with
//! exponential backoff until the cancellation token fires. Events sent while
//! disconnected are dropped; there is no offline queue.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use murmur_shared::ChannelEvent;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

use super::{ChannelError, ConnectionStatus, EventSink};

const BASE_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Something the channel reports to the client loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelNotice {
    /// An inbound event, in received order
    Event(ChannelEvent),
    /// The connection state changed
    Status(ConnectionStatus),
}

/// Sending half of the channel, cheap to clone.
#[derive(Clone)]
pub struct ChannelHandle {
    outbound: mpsc::UnboundedSender<ChannelEvent>,
    status: watch::Receiver<ConnectionStatus>,
}

impl ChannelHandle {
    /// Current connection state
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }
}

impl EventSink for ChannelHandle {
    fn send(&self, event: ChannelEvent) -> Result<(), ChannelError> {
        if self.status() != ConnectionStatus::Connected {
            return Err(ChannelError::Disconnected);
        }
        self.outbound.send(event).map_err(|_| ChannelError::Closed)
    }
}

/// How a connected session ended
enum SessionEnd {
    Shutdown,
    Lost(ChannelError),
}

/// WebSocket channel with auto-reconnect.
pub struct WebSocketChannel;

impl WebSocketChannel {
    /// Start the channel. Returns immediately; the connection is established
    /// in the background and reported through [`ChannelNotice::Status`].
    pub fn connect(
        endpoint: String,
        cancel: CancellationToken,
    ) -> (ChannelHandle, mpsc::UnboundedReceiver<ChannelNotice>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);

        tokio::spawn(Self::run_loop(
            endpoint,
            outbound_rx,
            notice_tx,
            status_tx,
            cancel,
        ));

        let handle = ChannelHandle {
            outbound: outbound_tx,
            status: status_rx,
        };
        (handle, notice_rx)
    }

    async fn run_loop(
        endpoint: String,
        mut outbound_rx: mpsc::UnboundedReceiver<ChannelEvent>,
        notice_tx: mpsc::UnboundedSender<ChannelNotice>,
        status_tx: watch::Sender<ConnectionStatus>,
        cancel: CancellationToken,
    ) {
        let mut failures: u32 = 0;
        loop {
            if cancel.is_cancelled() {
                break;
            }
            Self::publish_status(&status_tx, &notice_tx, ConnectionStatus::Connecting);

            let backoff = match Self::connect_once(
                &endpoint,
                &mut outbound_rx,
                &notice_tx,
                &status_tx,
                &cancel,
            )
            .await
            {
                Ok(SessionEnd::Shutdown) => {
                    tracing::info!("Channel shut down");
                    break;
                }
                Ok(SessionEnd::Lost(e)) => {
                    failures = 0;
                    tracing::warn!(error = %e, "Channel connection lost, reconnecting");
                    BASE_BACKOFF
                }
                Err(e) => {
                    failures += 1;
                    let backoff = Self::backoff_duration(failures);
                    tracing::warn!(
                        error = %e, attempt = failures,
                        backoff_secs = backoff.as_secs(),
                        "Channel connection failed, will reconnect"
                    );
                    backoff
                }
            };

            Self::publish_status(&status_tx, &notice_tx, ConnectionStatus::Disconnected);
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(backoff) => {}
            }
        }
        Self::publish_status(&status_tx, &notice_tx, ConnectionStatus::Disconnected);
    }

    async fn connect_once(
        endpoint: &str,
        outbound_rx: &mut mpsc::UnboundedReceiver<ChannelEvent>,
        notice_tx: &mpsc::UnboundedSender<ChannelNotice>,
        status_tx: &watch::Sender<ConnectionStatus>,
        cancel: &CancellationToken,
    ) -> Result<SessionEnd, ChannelError> {
        tracing::info!(endpoint = %endpoint, "Connecting channel");
        let ws = tokio::select! {
            _ = cancel.cancelled() => return Ok(SessionEnd::Shutdown),
            result = connect_async(endpoint) => result?.0,
        };

        // Anything queued while we were down is stale
        let mut dropped = 0usize;
        while outbound_rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped events queued while disconnected");
        }

        Self::publish_status(status_tx, notice_tx, ConnectionStatus::Connected);
        tracing::info!(endpoint = %endpoint, "Channel connected");

        let (mut write, mut read) = ws.split();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(SessionEnd::Shutdown);
                }
                outbound = outbound_rx.recv() => {
                    let Some(event) = outbound else {
                        return Ok(SessionEnd::Shutdown);
                    };
                    let frame = match event.encode() {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to encode outbound event");
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(frame.into())).await {
                        return Ok(SessionEnd::Lost(e.into()));
                    }
                }
                inbound = read.next() => match inbound {
                    Some(Ok(Message::Text(text))) => match ChannelEvent::decode(&text) {
                        Ok(event) => {
                            tracing::trace!(kind = %event.kind(), "Inbound event");
                            if notice_tx.send(ChannelNotice::Event(event)).is_err() {
                                return Ok(SessionEnd::Shutdown);
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "Dropping inbound frame"),
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = write.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Ok(SessionEnd::Lost(ChannelError::Closed));
                    }
                    Some(Err(e)) => return Ok(SessionEnd::Lost(e.into())),
                    Some(Ok(_)) => {}
                },
            }
        }
    }

    fn publish_status(
        status_tx: &watch::Sender<ConnectionStatus>,
        notice_tx: &mpsc::UnboundedSender<ChannelNotice>,
        status: ConnectionStatus,
    ) {
        let previous = status_tx.send_replace(status);
        if previous != status {
            let _ = notice_tx.send(ChannelNotice::Status(status));
        }
    }

    fn backoff_duration(failures: u32) -> Duration {
        let d = BASE_BACKOFF * 2u32.saturating_pow(failures.saturating_sub(1));
        d.min(MAX_BACKOFF)
    }
}
