//! UseCase: イベント中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayEventUseCase::execute() の配信先選定
//!
//! ### なぜこのテストが必要か
//! - chat は送信者自身を含む全員に届く（クライアントはエコーで自分の発言を描画する）
//! - typing は送信者以外にのみ届く（自分の「入力中」表示は不要）
//!
//! ### どのような状況を想定しているか
//! - 正常系：chat / typing の配信
//! - エッジケース：送信者のみが接続している場合
//! - 異常系：配信先チャンネルが閉じている場合（他の配信は継続）

use std::sync::Arc;

use murmur_shared::{ChannelEvent, EventKind};

use crate::domain::{ConnectionId, LobbyRepository};

/// 中継結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// フレームを届けた接続
    pub delivered: Vec<ConnectionId>,
    /// 配信に失敗した接続（切断処理中など）
    pub failed: Vec<ConnectionId>,
}

/// イベント中継のユースケース
pub struct RelayEventUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl RelayEventUseCase {
    /// 新しい RelayEventUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// イベントを中継する
    ///
    /// # Arguments
    ///
    /// * `from` - 送信元の接続
    /// * `event` - 復号済みのイベント（配信先の選定に使用）
    /// * `frame` - 受信したフレームそのもの（書き換えずに転送する）
    pub async fn execute(
        &self,
        from: &ConnectionId,
        event: &ChannelEvent,
        frame: &str,
    ) -> RelayReport {
        let targets = self.select_targets(from, event.kind()).await;

        let mut report = RelayReport::default();
        for target in targets {
            match self.repository.send_to(&target, frame.to_string()).await {
                Ok(()) => report.delivered.push(target),
                Err(e) => {
                    tracing::warn!("Failed to relay {} to '{}': {}", event.kind(), target, e);
                    report.failed.push(target);
                }
            }
        }
        report
    }

    /// 配信先を選定する
    async fn select_targets(&self, from: &ConnectionId, kind: EventKind) -> Vec<ConnectionId> {
        self.repository
            .get_connections()
            .await
            .into_iter()
            .map(|c| c.id)
            .filter(|id| match kind {
                EventKind::Chat => true,
                EventKind::Typing => id != from,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Connection, ConnectionIdFactory, Lobby, MockLobbyRepository, RepositoryError,
            Timestamp,
        },
        infrastructure::repository::InMemoryLobbyRepository,
    };
    use murmur_shared::{ChatPayload, TypingPayload};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    async fn connect(
        repository: &InMemoryLobbyRepository,
    ) -> (ConnectionId, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionIdFactory::generate();
        repository
            .add_connection(id.clone(), tx, Timestamp::new(0))
            .await
            .unwrap();
        (id, rx)
    }

    fn chat_event() -> ChannelEvent {
        ChannelEvent::Chat(ChatPayload {
            usuario: "alice".to_string(),
            mensaje: "hola".to_string(),
        })
    }

    fn typing_event() -> ChannelEvent {
        ChannelEvent::Typing(TypingPayload {
            nombre: "alice".to_string(),
            texto: "ho".to_string(),
        })
    }

    #[tokio::test]
    async fn test_chat_is_relayed_to_everyone_including_sender() {
        // テスト項目: chat は送信者を含む全員に届く
        // given (前提条件):
        let repository = InMemoryLobbyRepository::shared(Lobby::new(Timestamp::new(0)));
        let (alice, mut alice_rx) = connect(&repository).await;
        let (_bob, mut bob_rx) = connect(&repository).await;
        let usecase = RelayEventUseCase::new(repository.clone());
        let event = chat_event();
        let frame = event.encode().unwrap();

        // when (操作):
        let report = usecase.execute(&alice, &event, &frame).await;

        // then (期待する結果):
        assert_eq!(report.delivered.len(), 2);
        assert!(report.failed.is_empty());
        assert_eq!(alice_rx.recv().await.as_deref(), Some(frame.as_str()));
        assert_eq!(bob_rx.recv().await.as_deref(), Some(frame.as_str()));
    }

    #[tokio::test]
    async fn test_typing_is_not_echoed_to_sender() {
        // テスト項目: typing は送信者以外にのみ届く
        // given (前提条件):
        let repository = InMemoryLobbyRepository::shared(Lobby::new(Timestamp::new(0)));
        let (alice, mut alice_rx) = connect(&repository).await;
        let (bob, mut bob_rx) = connect(&repository).await;
        let usecase = RelayEventUseCase::new(repository.clone());
        let event = typing_event();
        let frame = event.encode().unwrap();

        // when (操作):
        let report = usecase.execute(&alice, &event, &frame).await;

        // then (期待する結果):
        assert_eq!(report.delivered, vec![bob]);
        assert_eq!(bob_rx.recv().await.as_deref(), Some(frame.as_str()));
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_typing_with_only_sender_connected() {
        // テスト項目: 送信者のみ接続中なら typing の配信先は空
        let repository = InMemoryLobbyRepository::shared(Lobby::new(Timestamp::new(0)));
        let (alice, _alice_rx) = connect(&repository).await;
        let usecase = RelayEventUseCase::new(repository.clone());
        let event = typing_event();

        let report = usecase.execute(&alice, &event, "{}").await;

        assert!(report.delivered.is_empty());
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn test_failed_target_does_not_stop_relay() {
        // テスト項目: 一部の配信失敗があっても残りの接続には配信される
        // given (前提条件):
        let alice = ConnectionIdFactory::generate();
        let bob = ConnectionIdFactory::generate();
        let connections = vec![
            Connection::new(alice.clone(), Timestamp::new(0)),
            Connection::new(bob.clone(), Timestamp::new(0)),
        ];
        let failing = alice.clone();
        let mut repository = MockLobbyRepository::new();
        repository
            .expect_get_connections()
            .returning(move || connections.clone());
        repository.expect_send_to().times(2).returning(move |id, _| {
            if *id == failing {
                Err(RepositoryError::ConnectionNotFound(id.to_string()))
            } else {
                Ok(())
            }
        });
        let usecase = RelayEventUseCase::new(Arc::new(repository));
        let event = chat_event();

        // when (操作):
        let report = usecase.execute(&bob, &event, "frame").await;

        // then (期待する結果):
        assert_eq!(report.delivered, vec![bob]);
        assert_eq!(report.failed, vec![alice]);
    }
}
