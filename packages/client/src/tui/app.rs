//! The chat screen's event loop.

use std::io;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::Backend};
use tokio::sync::mpsc;

use crate::{
    channel::ChannelNotice,
    notification::NotificationSettings,
    session::ChatSession,
    view::{ChatView, RenderCommand},
};

use super::render;

/// Volume change per key press, in percent
const VOLUME_STEP: u8 = 10;

pub struct App {
    session: ChatSession,
    settings: NotificationSettings,
    view: ChatView,
    draft: String,
    running: bool,
}

impl App {
    pub fn new(session: ChatSession, settings: NotificationSettings) -> Self {
        Self {
            session,
            settings,
            view: ChatView::new(),
            draft: String::new(),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn view(&self) -> &ChatView {
        &self.view
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Run until the user quits or the terminal input ends.
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut notices: mpsc::UnboundedReceiver<ChannelNotice>,
        mut renders: mpsc::UnboundedReceiver<RenderCommand>,
    ) -> io::Result<()> {
        let mut events = EventStream::new();
        terminal.draw(|frame| render::draw(frame, self))?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e),
                    None => self.running = false,
                },
                Some(notice) = notices.recv() => self.handle_notice(notice),
                Some(command) = renders.recv() => self.apply_render(command),
            }

            // apply everything already queued before drawing
            while let Ok(command) = renders.try_recv() {
                self.apply_render(command);
            }
            terminal.draw(|frame| render::draw(frame, self))?;
        }

        Ok(())
    }

    pub fn apply_render(&mut self, command: RenderCommand) {
        self.view.apply(command);
    }

    pub fn handle_notice(&mut self, notice: ChannelNotice) {
        match notice {
            ChannelNotice::Event(event) => {
                self.session.handle_inbound(event);
            }
            ChannelNotice::Status(status) => {
                self.apply_render(RenderCommand::SetConnectionStatus(status));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let config = self.settings.current();
        match key.code {
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            KeyCode::Enter => {
                if !self.draft.is_empty() {
                    self.session.send_chat(&self.draft);
                    self.draft.clear();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.draft.push(c);
                self.session.input_changed(&self.draft);
            }
            KeyCode::Backspace => {
                if self.draft.pop().is_some() {
                    self.session.input_changed(&self.draft);
                }
            }

            // notification settings
            KeyCode::F(2) => self.settings.set_audio_enabled(!config.audio_enabled),
            KeyCode::F(3) => self
                .settings
                .set_volume_percent(config.volume_percent().saturating_sub(VOLUME_STEP)),
            KeyCode::F(4) => self
                .settings
                .set_volume_percent(config.volume_percent().saturating_add(VOLUME_STEP)),
            KeyCode::F(5) => self.settings.set_sound_profile(config.sound_profile.next()),
            KeyCode::F(6) => self.settings.set_visual_enabled(!config.visual_enabled),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use murmur_shared::{ChannelEvent, ChatPayload};

    use super::*;
    use crate::{
        channel::{ChannelError, ConnectionStatus, MockEventSink},
        domain::DisplayName,
        notification::{
            NotificationDispatcher, SoundProfile, ToastPresenter, ToneRenderer, ToneSynthesizer,
            output::MockAudioOutput,
        },
        view::ViewHandle,
    };

    fn app(sink: MockEventSink) -> (App, mpsc::UnboundedReceiver<RenderCommand>) {
        let settings = NotificationSettings::default();
        let (handle, rx) = ViewHandle::channel();
        let mut output = MockAudioOutput::new();
        output.expect_play().returning(|_| Ok(()));
        let dispatcher = NotificationDispatcher::new(
            settings.reader(),
            ToneSynthesizer::new(ToneRenderer::new(8_000), Box::new(output)),
            ToastPresenter::new(Arc::new(handle.clone())),
            Arc::new(handle.clone()),
        );
        let session = ChatSession::new(
            Some(DisplayName::new("alice").unwrap()),
            Arc::new(sink),
            handle,
            dispatcher,
        );
        (App::new(session, settings), rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(event: &ChannelEvent) -> Option<&str> {
        match event {
            ChannelEvent::Typing(payload) => Some(payload.texto.as_str()),
            ChannelEvent::Chat(_) => None,
        }
    }

    #[test]
    fn test_every_keystroke_emits_typing() {
        // テスト項目: 文字入力とバックスペースのたびに typing を送信する
        // given (前提条件):
        let drafts = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorded = drafts.clone();
        let mut sink = MockEventSink::new();
        sink.expect_send().returning(move |event| {
            if let Some(draft) = typed(&event) {
                recorded.lock().unwrap().push(draft.to_string());
            }
            Ok(())
        });
        let (mut app, _rx) = app(sink);

        // when (操作):
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('i')));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));

        // then (期待する結果): 空の入力でのバックスペースは変更なしのため送信しない
        assert_eq!(*drafts.lock().unwrap(), vec!["h", "hi", "h", ""]);
        assert_eq!(app.draft(), "");
    }

    #[test]
    fn test_enter_sends_chat_and_clears_draft() {
        // テスト項目: Enter でチャットを送信し、入力欄を空にする
        // given (前提条件):
        let mut sink = MockEventSink::new();
        sink.expect_send()
            .withf(|event: &ChannelEvent| matches!(event, ChannelEvent::Typing(_)))
            .returning(|_| Ok(()));
        sink.expect_send()
            .withf(|event: &ChannelEvent| {
                *event
                    == ChannelEvent::Chat(ChatPayload {
                        usuario: "alice".to_string(),
                        mensaje: "yo".to_string(),
                    })
            })
            .times(1)
            .returning(|_| Ok(()));
        let (mut app, _rx) = app(sink);
        app.handle_key(key(KeyCode::Char('y')));
        app.handle_key(key(KeyCode::Char('o')));

        // when (操作):
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Enter));

        // then (期待する結果): 2 回目の Enter は空のため送信しない
        assert_eq!(app.draft(), "");
    }

    #[test]
    fn test_send_while_disconnected_still_clears_draft() {
        // テスト項目: 切断中の送信はエラーにならず破棄される
        let mut sink = MockEventSink::new();
        sink.expect_send().returning(|_| Err(ChannelError::Disconnected));
        let (mut app, _rx) = app(sink);

        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.draft(), "");
        assert!(app.is_running());
    }

    #[test]
    fn test_function_keys_drive_settings() {
        // テスト項目: F2〜F6 が各通知設定を操作する
        // given (前提条件):
        let (mut app, _rx) = app(MockEventSink::new());

        // when (操作):
        app.handle_key(key(KeyCode::F(2)));
        app.handle_key(key(KeyCode::F(3)));
        app.handle_key(key(KeyCode::F(5)));
        app.handle_key(key(KeyCode::F(6)));

        // then (期待する結果):
        let config = app.settings().current();
        assert!(!config.audio_enabled);
        assert_eq!(config.volume_label(), "30%");
        assert_eq!(config.sound_profile, SoundProfile::Simple);
        assert!(!config.visual_enabled);
    }

    #[test]
    fn test_volume_keys_stay_in_range() {
        // テスト項目: 音量は 0%〜100% の範囲に収まる
        let (mut app, _rx) = app(MockEventSink::new());

        for _ in 0..12 {
            app.handle_key(key(KeyCode::F(4)));
        }
        assert_eq!(app.settings().current().volume, 1.0);

        for _ in 0..12 {
            app.handle_key(key(KeyCode::F(3)));
        }
        assert_eq!(app.settings().current().volume, 0.0);
    }

    #[test]
    fn test_quit_keys() {
        // テスト項目: Esc と Ctrl-C で終了する
        let (mut app, _rx) = app(MockEventSink::new());
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.is_running());

        let (mut app, _rx) = app_with_ctrl_c();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.is_running());
        assert_eq!(app.draft(), "");
    }

    fn app_with_ctrl_c() -> (App, mpsc::UnboundedReceiver<RenderCommand>) {
        let mut sink = MockEventSink::new();
        sink.expect_send().never();
        app(sink)
    }

    #[tokio::test]
    async fn test_notices_reach_the_view() {
        // テスト項目: 受信イベントと接続状態が画面に反映される
        // given (前提条件):
        let (mut app, mut rx) = app(MockEventSink::new());

        // when (操作):
        app.handle_notice(ChannelNotice::Status(ConnectionStatus::Connected));
        app.handle_notice(ChannelNotice::Event(ChannelEvent::Chat(ChatPayload {
            usuario: "bob".to_string(),
            mensaje: "hey".to_string(),
        })));
        while let Ok(command) = rx.try_recv() {
            app.apply_render(command);
        }

        // then (期待する結果):
        assert_eq!(app.view().status(), ConnectionStatus::Connected);
        assert_eq!(app.view().messages()[0].body, "hey");
        assert_eq!(app.session().identity().unwrap().as_str(), "alice");
    }
}
