//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の登録
//! - 異常系：Lobby の容量超過、重複した接続 ID

use std::sync::Arc;

use murmur_shared::time::get_jst_timestamp;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{ConnectionId, LobbyError, LobbyRepository, RepositoryError, Timestamp};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// 参加者接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続時刻
    /// * `Err(ConnectError)` - 接続拒否
    pub async fn execute(
        &self,
        id: ConnectionId,
        sender: UnboundedSender<String>,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = Timestamp::new(get_jst_timestamp());
        match self
            .repository
            .add_connection(id, sender, connected_at)
            .await
        {
            Ok(()) => Ok(connected_at),
            Err(RepositoryError::Lobby(LobbyError::DuplicateConnection(id))) => {
                Err(ConnectError::DuplicateConnection(id))
            }
            Err(_) => Err(ConnectError::LobbyCapacityExceeded),
        }
    }
}
