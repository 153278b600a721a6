//! InMemory Lobby Repository 実装
//!
//! ドメイン層が定義する LobbyRepository trait の具体的な実装。
//! 接続ごとの送信チャンネルは HashMap に、接続一覧は Lobby ドメインモデルに保持します。
//! メッセージ履歴は保持しません（永続化は対象外）。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::{
    Connection, ConnectionId, Lobby, LobbyRepository, RepositoryError, Timestamp,
};

/// インメモリ Lobby Repository 実装
pub struct InMemoryLobbyRepository {
    /// 接続ごとの送信チャンネル
    senders: Mutex<HashMap<ConnectionId, UnboundedSender<String>>>,
    /// Lobby ドメインモデル
    lobby: Mutex<Lobby>,
}

impl InMemoryLobbyRepository {
    /// 新しい InMemoryLobbyRepository を作成
    pub fn new(lobby: Lobby) -> Self {
        Self {
            senders: Mutex::new(HashMap::new()),
            lobby: Mutex::new(lobby),
        }
    }

    /// Arc で包んだ Repository を作成
    pub fn shared(lobby: Lobby) -> Arc<Self> {
        Arc::new(Self::new(lobby))
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn get_lobby(&self) -> Lobby {
        self.lobby.lock().await.clone()
    }

    async fn add_connection(
        &self,
        id: ConnectionId,
        sender: UnboundedSender<String>,
        connected_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        // ドメインモデル側で容量・重複を検証してから送信チャンネルを登録する
        {
            let mut lobby = self.lobby.lock().await;
            lobby.add_connection(Connection::new(id.clone(), connected_at))?;
        }

        let mut senders = self.senders.lock().await;
        senders.insert(id, sender);
        Ok(())
    }

    async fn remove_connection(&self, id: &ConnectionId) -> Result<(), RepositoryError> {
        let mut senders = self.senders.lock().await;
        senders
            .remove(id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))?;

        let mut lobby = self.lobby.lock().await;
        lobby.remove_connection(id);
        Ok(())
    }

    async fn get_connections(&self) -> Vec<Connection> {
        self.lobby.lock().await.connections.clone()
    }

    async fn send_to(&self, id: &ConnectionId, frame: String) -> Result<(), RepositoryError> {
        let senders = self.senders.lock().await;
        let sender = senders
            .get(id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))?;
        // 受信側タスクが既に終了している場合は切断処理に任せる
        sender
            .send(frame)
            .map_err(|_| RepositoryError::ConnectionNotFound(id.to_string()))
    }
}
