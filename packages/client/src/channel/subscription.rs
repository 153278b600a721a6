//! Single-slot event subscriptions.
//!
//! Each event kind has at most one handler. Registering again replaces the
//! previous handler, there is no fan-out.

use std::collections::HashMap;

use murmur_shared::{ChannelEvent, EventKind};

use crate::domain::{ChatMessage, TypingSignal};

/// Handler invoked for an inbound event
pub type Handler = Box<dyn FnMut(ChannelEvent) + Send>;

/// One handler slot per event kind
#[derive(Default)]
pub struct Subscriptions {
    handlers: HashMap<EventKind, Handler>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `kind`, returning the one it replaces.
    pub fn on_event<F>(&mut self, kind: EventKind, handler: F) -> Option<Handler>
    where
        F: FnMut(ChannelEvent) + Send + 'static,
    {
        self.handlers.insert(kind, Box::new(handler))
    }

    /// Register the `chat` handler with the payload already converted.
    pub fn on_chat<F>(&mut self, mut handler: F) -> Option<Handler>
    where
        F: FnMut(ChatMessage) + Send + 'static,
    {
        self.on_event(EventKind::Chat, move |event| {
            if let ChannelEvent::Chat(payload) = event {
                handler(payload.into());
            }
        })
    }

    /// Register the `typing` handler with the payload already converted.
    pub fn on_typing<F>(&mut self, mut handler: F) -> Option<Handler>
    where
        F: FnMut(TypingSignal) + Send + 'static,
    {
        self.on_event(EventKind::Typing, move |event| {
            if let ChannelEvent::Typing(payload) = event {
                handler(payload.into());
            }
        })
    }

    /// Whether a handler is registered for `kind`
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Route an inbound event. Returns false when nobody listens for its kind.
    pub fn dispatch(&mut self, event: ChannelEvent) -> bool {
        match self.handlers.get_mut(&event.kind()) {
            Some(handler) => {
                handler(event);
                true
            }
            None => {
                tracing::debug!("No handler for {} event", event.kind());
                false
            }
        }
    }
}
