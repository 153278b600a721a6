//! Murmur terminal chat client.
//!
//! Exchanges chat messages and live typing signals with the relay, and
//! alerts on new messages with a synthesized tone and a toast.
//!
//! - [`channel`]: WebSocket transport and single-slot subscriptions
//! - [`presence`]: typing signals and the "is typing" indicator
//! - [`notification`]: settings, tones, toasts, and the dispatcher
//! - [`session`]: wires inbound events to the above
//! - [`tui`]: the terminal surface

pub mod channel;
pub mod config;
pub mod domain;
pub mod error;
pub mod notification;
pub mod presence;
pub mod session;
pub mod tui;
pub mod view;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

pub use config::ClientArgs;
pub use error::ClientError;

use crate::{
    channel::WebSocketChannel,
    notification::{
        NotificationDispatcher, NotificationSettings, ToastPresenter, ToneRenderer,
        ToneSynthesizer,
    },
    session::ChatSession,
    tui::App,
    view::ViewHandle,
};

/// Run the client until the user quits.
pub async fn run_client(args: ClientArgs) -> Result<(), ClientError> {
    let endpoint = args.endpoint()?;
    let Some(identity) = tui::welcome::resolve_identity(args.name.clone()).await? else {
        tracing::info!("No display name entered, exiting");
        return Ok(());
    };
    tracing::info!(%endpoint, name = %identity, "Starting chat client");

    let cancel = CancellationToken::new();
    let (channel, notices) = WebSocketChannel::connect(endpoint, cancel.clone());

    let settings = NotificationSettings::new(args.notification_config());
    let (view, renders) = ViewHandle::channel();
    let dispatcher = NotificationDispatcher::new(
        settings.reader(),
        ToneSynthesizer::new(ToneRenderer::new(args.sample_rate), args.audio_output()),
        ToastPresenter::new(Arc::new(view.clone())),
        Arc::new(view.clone()),
    );
    let session = ChatSession::new(Some(identity), Arc::new(channel), view, dispatcher);

    let mut app = App::new(session, settings);
    let result = tui::run(&mut app, notices, renders).await;
    cancel.cancel();

    result.map_err(ClientError::from)
}
