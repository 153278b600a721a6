//! UseCase: 参加者切断処理
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続の削除
//! - 異常系：存在しない接続の切断試行

use std::sync::Arc;

use crate::domain::{ConnectionId, LobbyRepository};

use super::error::DisconnectError;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// 参加者切断を実行
    pub async fn execute(&self, id: &ConnectionId) -> Result<(), DisconnectError> {
        self.repository
            .remove_connection(id)
            .await
            .map_err(|_| DisconnectError::ConnectionNotFound(id.to_string()))
    }
}
