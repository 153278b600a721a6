//! End-to-end tests against an in-process relay server.

use std::{sync::Arc, time::Duration};

use murmur_client::{
    channel::{
        ChannelError, ChannelHandle, ChannelNotice, ConnectionStatus, EventSink, WebSocketChannel,
    },
    domain::DisplayName,
    notification::{
        NotificationDispatcher, NotificationSettings, ToastPresenter, ToneRenderer,
        ToneSynthesizer, output::NoAudioOutput,
    },
    session::ChatSession,
    view::{ChatView, RenderCommand, ViewHandle},
};
use murmur_shared::{ChannelEvent, ChatPayload, TypingPayload};
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
    time::timeout,
};
use tokio_util::sync::CancellationToken;

const WAIT: Duration = Duration::from_secs(5);

struct Relay {
    base_url: String,
    ws_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Relay {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            murmur_server::serve(listener, 10, shutdown).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}"),
            ws_url: format!("ws://{addr}/ws"),
            shutdown: Some(shutdown_tx),
        }
    }
}

impl Relay {
    /// Wait until the relay has registered `count` connections.
    ///
    /// The client sees the handshake complete slightly before the relay adds
    /// the connection to the lobby.
    async fn wait_for_connections(&self, count: u64) {
        let url = format!("{}/api/lobby", self.base_url);
        timeout(WAIT, async {
            loop {
                let lobby: serde_json::Value =
                    reqwest::get(&url).await.unwrap().json().await.unwrap();
                if lobby["connection_count"].as_u64() == Some(count) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("timed out waiting for the lobby");
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn wait_connected(notices: &mut mpsc::UnboundedReceiver<ChannelNotice>) {
    timeout(WAIT, async {
        while let Some(notice) = notices.recv().await {
            if notice == ChannelNotice::Status(ConnectionStatus::Connected) {
                return;
            }
        }
        panic!("channel closed before connecting");
    })
    .await
    .expect("timed out waiting for connection");
}

async fn next_event(notices: &mut mpsc::UnboundedReceiver<ChannelNotice>) -> ChannelEvent {
    timeout(WAIT, async {
        loop {
            match notices.recv().await {
                Some(ChannelNotice::Event(event)) => return event,
                Some(ChannelNotice::Status(_)) => continue,
                None => panic!("channel closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

async fn connect(
    relay: &Relay,
    cancel: &CancellationToken,
) -> (ChannelHandle, mpsc::UnboundedReceiver<ChannelNotice>) {
    let (handle, mut notices) = WebSocketChannel::connect(relay.ws_url.clone(), cancel.clone());
    wait_connected(&mut notices).await;
    (handle, notices)
}

#[tokio::test]
async fn test_chat_reaches_everyone_including_sender() {
    // テスト項目: チャットは送信者を含む全員に届く
    // given (前提条件):
    let relay = Relay::start().await;
    let cancel = CancellationToken::new();
    let (alice, mut alice_notices) = connect(&relay, &cancel).await;
    let (_bob, mut bob_notices) = connect(&relay, &cancel).await;
    relay.wait_for_connections(2).await;
    let chat = ChannelEvent::Chat(ChatPayload {
        usuario: "alice".to_string(),
        mensaje: "hola".to_string(),
    });

    // when (操作):
    alice.send(chat.clone()).unwrap();

    // then (期待する結果):
    assert_eq!(next_event(&mut bob_notices).await, chat);
    assert_eq!(next_event(&mut alice_notices).await, chat);

    cancel.cancel();
}

#[tokio::test]
async fn test_typing_reaches_others_only() {
    // テスト項目: typing は送信者以外に届く
    // given (前提条件):
    let relay = Relay::start().await;
    let cancel = CancellationToken::new();
    let (alice, mut alice_notices) = connect(&relay, &cancel).await;
    let (_bob, mut bob_notices) = connect(&relay, &cancel).await;
    relay.wait_for_connections(2).await;

    // when (操作):
    alice
        .send(ChannelEvent::Typing(TypingPayload {
            nombre: "alice".to_string(),
            texto: "ho".to_string(),
        }))
        .unwrap();
    let marker = ChannelEvent::Chat(ChatPayload {
        usuario: "alice".to_string(),
        mensaje: "marker".to_string(),
    });
    alice.send(marker.clone()).unwrap();

    // then (期待する結果): alice が最初に受け取るのは自分の typing ではなくチャット
    assert!(matches!(
        next_event(&mut bob_notices).await,
        ChannelEvent::Typing(payload) if payload.texto == "ho"
    ));
    assert_eq!(next_event(&mut alice_notices).await, marker);

    cancel.cancel();
}

#[tokio::test]
async fn test_session_renders_inbound_chat_with_notifications() {
    // テスト項目: 受信したチャットが描画され、音声失敗時もトーストが表示される
    // given (前提条件):
    let relay = Relay::start().await;
    let cancel = CancellationToken::new();
    let (alice, _alice_notices) = connect(&relay, &cancel).await;
    let (bob_channel, mut bob_notices) = connect(&relay, &cancel).await;
    relay.wait_for_connections(2).await;

    let settings = NotificationSettings::default();
    let (view, mut renders) = ViewHandle::channel();
    let dispatcher = NotificationDispatcher::new(
        settings.reader(),
        ToneSynthesizer::new(ToneRenderer::default(), Box::new(NoAudioOutput)),
        ToastPresenter::new(Arc::new(view.clone())),
        Arc::new(view.clone()),
    );
    let mut bob = ChatSession::new(
        Some(DisplayName::new("bob").unwrap()),
        Arc::new(bob_channel),
        view,
        dispatcher,
    );
    let alice_session_sink: Arc<dyn EventSink> = Arc::new(alice);

    // when (操作):
    alice_session_sink
        .send(ChannelEvent::Typing(TypingPayload {
            nombre: "alice".to_string(),
            texto: "h".to_string(),
        }))
        .unwrap();
    bob.handle_inbound(next_event(&mut bob_notices).await);
    alice_session_sink
        .send(ChannelEvent::Chat(ChatPayload {
            usuario: "alice".to_string(),
            mensaje: "hi bob".to_string(),
        }))
        .unwrap();
    bob.handle_inbound(next_event(&mut bob_notices).await);

    // then (期待する結果):
    let mut screen = ChatView::new();
    let mut commands = Vec::new();
    while let Ok(command) = renders.try_recv() {
        commands.push(command.clone());
        screen.apply(command);
    }
    assert_eq!(screen.messages()[0].body, "hi bob");
    assert_eq!(screen.typing_indicator(), None);
    assert_eq!(screen.toasts()[0].text, "New message from: alice");
    assert!(commands.contains(&RenderCommand::SetTypingIndicator(Some(
        "alice is typing…".to_string()
    ))));

    cancel.cancel();
}

#[tokio::test]
async fn test_send_while_disconnected_is_dropped() {
    // テスト項目: 未接続中の送信はキューされずに破棄される
    // given (前提条件): 誰も listen していないポート
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let cancel = CancellationToken::new();
    let (handle, _notices) = WebSocketChannel::connect(format!("ws://{addr}/ws"), cancel.clone());

    // when (操作):
    let result = handle.send(ChannelEvent::Chat(ChatPayload {
        usuario: "alice".to_string(),
        mensaje: "lost".to_string(),
    }));

    // then (期待する結果):
    assert!(matches!(result, Err(ChannelError::Disconnected)));
    assert_ne!(handle.status(), ConnectionStatus::Connected);

    cancel.cancel();
}
