//! A chat session: routes inbound events and publishes local input.

use std::sync::Arc;

use murmur_shared::{
    ChannelEvent,
    time::{get_jst_timestamp, timestamp_to_jst_clock},
};

use crate::{
    channel::{EventSink, Subscriptions},
    domain::{ChatMessage, DisplayName, MessageBody},
    notification::NotificationDispatcher,
    presence::PresenceSignaler,
    view::{RenderedMessage, ViewHandle},
};

pub struct ChatSession {
    identity: Option<DisplayName>,
    sink: Arc<dyn EventSink>,
    presence: Arc<PresenceSignaler>,
    subscriptions: Subscriptions,
}

impl ChatSession {
    /// Wire up the inbound handlers.
    ///
    /// `chat` is appended to the log and then handed to the dispatcher, which
    /// clears the typing indicator. `typing` goes to the presence signaler.
    pub fn new(
        identity: Option<DisplayName>,
        sink: Arc<dyn EventSink>,
        view: ViewHandle,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        let presence = Arc::new(PresenceSignaler::new(
            identity.clone(),
            Arc::clone(&sink),
            Arc::new(view.clone()),
        ));

        let mut subscriptions = Subscriptions::new();
        let own_name = identity.as_ref().map(|name| name.as_str().to_string());
        subscriptions.on_chat(move |message: ChatMessage| {
            view.append_message(render(&message, own_name.as_deref()));
            dispatcher.on_chat(&message);
        });
        let typing = Arc::clone(&presence);
        subscriptions.on_typing(move |signal| typing.on_typing(&signal));

        Self {
            identity,
            sink,
            presence,
            subscriptions,
        }
    }

    pub fn identity(&self) -> Option<&DisplayName> {
        self.identity.as_ref()
    }

    /// Send a chat message. Skipped when the body is empty or no display name
    /// is set. Returns whether an event was handed to the channel.
    pub fn send_chat(&self, body: &str) -> bool {
        let Some(name) = &self.identity else {
            tracing::debug!("No display name set, chat message skipped");
            return false;
        };
        let body = match MessageBody::new(body) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Chat message skipped: {}", e);
                return false;
            }
        };

        let message = ChatMessage::new(name.as_str(), body.into_string());
        match self.sink.send(ChannelEvent::Chat(message.into())) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Chat message dropped: {}", e);
                false
            }
        }
    }

    /// The local draft changed
    pub fn input_changed(&self, draft: &str) -> bool {
        self.presence.on_input_changed(draft)
    }

    /// Route an inbound event to its handler
    pub fn handle_inbound(&mut self, event: ChannelEvent) -> bool {
        self.subscriptions.dispatch(event)
    }
}

fn render(message: &ChatMessage, own_name: Option<&str>) -> RenderedMessage {
    RenderedMessage {
        sender: message.sender.clone(),
        body: message.body.clone(),
        received_at: timestamp_to_jst_clock(get_jst_timestamp()),
        own: own_name == Some(message.sender.as_str()),
    }
}
