//! Server state shared by the handlers.

use std::sync::Arc;

use crate::domain::LobbyRepository;

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn LobbyRepository>,
}
