//! Typing presence: outbound typing signals and the "is typing" indicator.

use std::sync::Arc;

use murmur_shared::ChannelEvent;

use crate::{
    channel::EventSink,
    domain::{DisplayName, TypingSignal},
};

/// Where the typing indicator line is drawn
pub trait IndicatorSurface: Send + Sync {
    /// Show `text`, or clear the indicator with `None`
    fn set_indicator(&self, text: Option<String>);
}

pub struct PresenceSignaler {
    identity: Option<DisplayName>,
    sink: Arc<dyn EventSink>,
    indicator: Arc<dyn IndicatorSurface>,
}

impl PresenceSignaler {
    pub fn new(
        identity: Option<DisplayName>,
        sink: Arc<dyn EventSink>,
        indicator: Arc<dyn IndicatorSurface>,
    ) -> Self {
        Self {
            identity,
            sink,
            indicator,
        }
    }

    /// Emit the current draft after a local input change. Every change is sent,
    /// including the empty draft after clearing the input. Returns whether an
    /// event was handed to the channel.
    pub fn on_input_changed(&self, draft: &str) -> bool {
        let Some(name) = &self.identity else {
            tracing::trace!("No display name set, typing signal skipped");
            return false;
        };

        let signal = TypingSignal::new(name.as_str(), draft);
        match self.sink.send(ChannelEvent::Typing(signal.into())) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Typing signal dropped: {}", e);
                false
            }
        }
    }

    /// Render an inbound typing signal. The latest signal always wins.
    pub fn on_typing(&self, signal: &TypingSignal) {
        self.indicator.set_indicator(signal.indicator_text());
    }
}
