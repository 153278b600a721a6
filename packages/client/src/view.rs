//! View model for the chat screen.
//!
//! The core never draws. It emits [`RenderCommand`]s through a [`ViewHandle`],
//! and the terminal surface applies them to its [`ChatView`].

use tokio::sync::mpsc;

use crate::{
    channel::ConnectionStatus,
    notification::toast::{Toast, ToastId, ToastState, ToastSurface},
    presence::IndicatorSurface,
};

/// A chat message as shown in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub sender: String,
    pub body: String,
    /// Receive time as a JST `HH:MM` clock
    pub received_at: String,
    /// Sent under the local display name
    pub own: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    AppendMessage(RenderedMessage),
    SetTypingIndicator(Option<String>),
    MountToast { id: ToastId, text: String },
    SetToastState { id: ToastId, state: ToastState },
    RemoveToast(ToastId),
    SetConnectionStatus(ConnectionStatus),
}

/// Sends render commands to the surface. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    tx: mpsc::UnboundedSender<RenderCommand>,
}

impl ViewHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RenderCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn append_message(&self, message: RenderedMessage) {
        self.emit(RenderCommand::AppendMessage(message));
    }

    fn emit(&self, command: RenderCommand) {
        // the surface is gone once the UI has shut down
        if self.tx.send(command).is_err() {
            tracing::trace!("View closed, render command dropped");
        }
    }
}

impl IndicatorSurface for ViewHandle {
    fn set_indicator(&self, text: Option<String>) {
        self.emit(RenderCommand::SetTypingIndicator(text));
    }
}

impl ToastSurface for ViewHandle {
    fn mount(&self, toast: &Toast) {
        self.emit(RenderCommand::MountToast {
            id: toast.id,
            text: toast.text.clone(),
        });
    }

    fn set_state(&self, id: ToastId, state: ToastState) {
        self.emit(RenderCommand::SetToastState { id, state });
    }

    fn remove(&self, id: ToastId) {
        self.emit(RenderCommand::RemoveToast(id));
    }
}

/// A toast currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub id: ToastId,
    pub text: String,
    pub state: ToastState,
}

/// Everything the chat screen shows apart from the input line
#[derive(Debug, Clone)]
pub struct ChatView {
    messages: Vec<RenderedMessage>,
    typing_indicator: Option<String>,
    /// Newest first
    toasts: Vec<ToastView>,
    status: ConnectionStatus,
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            typing_indicator: None,
            toasts: Vec::new(),
            status: ConnectionStatus::Connecting,
        }
    }

    pub fn apply(&mut self, command: RenderCommand) {
        match command {
            RenderCommand::AppendMessage(message) => self.messages.push(message),
            RenderCommand::SetTypingIndicator(text) => self.typing_indicator = text,
            RenderCommand::MountToast { id, text } => self.toasts.insert(
                0,
                ToastView {
                    id,
                    text,
                    state: ToastState::Entering,
                },
            ),
            RenderCommand::SetToastState { id, state } => {
                if let Some(toast) = self.toasts.iter_mut().find(|toast| toast.id == id) {
                    toast.state = state;
                }
            }
            // no-op if the toast is already gone
            RenderCommand::RemoveToast(id) => self.toasts.retain(|toast| toast.id != id),
            RenderCommand::SetConnectionStatus(status) => self.status = status,
        }
    }

    pub fn messages(&self) -> &[RenderedMessage] {
        &self.messages
    }

    pub fn typing_indicator(&self) -> Option<&str> {
        self.typing_indicator.as_deref()
    }

    pub fn toasts(&self) -> &[ToastView] {
        &self.toasts
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::notification::toast::ToastPresenter;

    fn message(sender: &str, body: &str) -> RenderedMessage {
        RenderedMessage {
            sender: sender.to_string(),
            body: body.to_string(),
            received_at: "12:00".to_string(),
            own: false,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<RenderCommand>, view: &mut ChatView) {
        while let Ok(command) = rx.try_recv() {
            view.apply(command);
        }
    }

    #[test]
    fn test_messages_are_appended_in_order() {
        // テスト項目: メッセージは受信順に追記される
        let mut view = ChatView::new();

        view.apply(RenderCommand::AppendMessage(message("alice", "1")));
        view.apply(RenderCommand::AppendMessage(message("bob", "2")));

        let bodies: Vec<_> = view.messages().iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["1", "2"]);
    }

    #[test]
    fn test_toasts_stack_newest_first_and_removal_is_idempotent() {
        // テスト項目: トーストは新しい順に積まれ、削除は冪等
        // given (前提条件):
        let mut view = ChatView::new();
        let (handle, mut rx) = ViewHandle::channel();
        let first = Toast {
            id: ToastId::from_raw(1),
            text: "first".to_string(),
            created_at: Instant::now(),
        };
        let second = Toast {
            id: ToastId::from_raw(2),
            text: "second".to_string(),
            created_at: Instant::now(),
        };

        // when (操作):
        handle.mount(&first);
        handle.mount(&second);
        handle.set_state(first.id, ToastState::Visible);
        handle.remove(first.id);
        handle.remove(first.id);
        handle.set_state(first.id, ToastState::Exiting);
        drain(&mut rx, &mut view);

        // then (期待する結果):
        assert_eq!(
            view.toasts(),
            &[ToastView {
                id: second.id,
                text: "second".to_string(),
                state: ToastState::Entering,
            }]
        );
    }

    #[test]
    fn test_indicator_and_status() {
        // テスト項目: タイピング表示と接続状態の更新
        let mut view = ChatView::new();
        let (handle, mut rx) = ViewHandle::channel();

        handle.set_indicator(Some("bob is typing…".to_string()));
        drain(&mut rx, &mut view);
        view.apply(RenderCommand::SetConnectionStatus(ConnectionStatus::Connected));
        assert_eq!(view.typing_indicator(), Some("bob is typing…"));
        assert_eq!(view.status(), ConnectionStatus::Connected);

        handle.set_indicator(None);
        drain(&mut rx, &mut view);
        assert_eq!(view.typing_indicator(), None);
    }

    #[test]
    fn test_closed_view_drops_commands() {
        // テスト項目: 描画側が終了していても送信でパニックしない
        let (handle, rx) = ViewHandle::channel();
        drop(rx);

        handle.set_indicator(None);
        handle.append_message(message("alice", "late"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_presented_toast_leaves_the_view() {
        // テスト項目: ToastPresenter 経由のトーストはライフサイクル終了後に画面から消える
        // given (前提条件):
        let mut view = ChatView::new();
        let (handle, mut rx) = ViewHandle::channel();
        let presenter = ToastPresenter::new(std::sync::Arc::new(handle));

        // when (操作):
        let toast = presenter.present("New message from: alice");
        drain(&mut rx, &mut view);
        assert_eq!(view.toasts()[0].state, ToastState::Entering);

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        drain(&mut rx, &mut view);
        assert_eq!(view.toasts()[0].state, ToastState::Visible);

        toast.finished().await;
        drain(&mut rx, &mut view);

        // then (期待する結果):
        assert!(view.toasts().is_empty());
    }
}
