//! Reacts to inbound chat messages with the configured notifications.

use std::sync::Arc;

use crate::{domain::ChatMessage, presence::IndicatorSurface};

use super::{
    config::NotificationConfigReader,
    player::{PlayOutcome, ToneSynthesizer},
    toast::{ToastId, ToastPresenter},
};

/// What a single dispatch did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// `None` when audio is disabled
    pub audio: Option<PlayOutcome>,
    /// `None` when visual notifications are disabled
    pub toast: Option<ToastId>,
}

pub struct NotificationDispatcher {
    config: NotificationConfigReader,
    synthesizer: ToneSynthesizer,
    toasts: ToastPresenter,
    indicator: Arc<dyn IndicatorSurface>,
}

impl NotificationDispatcher {
    pub fn new(
        config: NotificationConfigReader,
        synthesizer: ToneSynthesizer,
        toasts: ToastPresenter,
        indicator: Arc<dyn IndicatorSurface>,
    ) -> Self {
        Self {
            config,
            synthesizer,
            toasts,
            indicator,
        }
    }

    /// Handle an inbound chat message.
    ///
    /// The typing indicator is always cleared. Audio and the toast are independent:
    /// each fires when enabled in the settings read right now.
    pub fn on_chat(&self, message: &ChatMessage) -> DispatchReport {
        self.indicator.set_indicator(None);

        let config = self.config.current();
        let audio = config
            .audio_enabled
            .then(|| self.synthesizer.play(config.sound_profile, config.volume));
        let toast = config.visual_enabled.then(|| {
            self.toasts
                .present(format!("New message from: {}", message.sender))
                .id()
        });

        tracing::debug!(sender = %message.sender, ?audio, ?toast, "Dispatched notifications");
        DispatchReport { audio, toast }
    }
}
