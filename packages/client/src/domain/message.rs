//! Chat messages and typing signals.

use murmur_shared::{ChatPayload, TypingPayload};

/// A chat message as exchanged with peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: String,
    pub body: String,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
        }
    }
}

impl From<ChatPayload> for ChatMessage {
    fn from(payload: ChatPayload) -> Self {
        Self {
            sender: payload.usuario,
            body: payload.mensaje,
        }
    }
}

impl From<ChatMessage> for ChatPayload {
    fn from(message: ChatMessage) -> Self {
        Self {
            usuario: message.sender,
            mensaje: message.body,
        }
    }
}

/// Typing state of a peer. An empty draft means the peer stopped typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingSignal {
    pub sender: String,
    pub draft: String,
}

impl TypingSignal {
    pub fn new(sender: impl Into<String>, draft: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            draft: draft.into(),
        }
    }

    /// Whether the peer is currently typing
    pub fn is_typing(&self) -> bool {
        !self.draft.is_empty()
    }

    /// Indicator line for this signal, `None` when it clears the indicator
    pub fn indicator_text(&self) -> Option<String> {
        self.is_typing()
            .then(|| format!("{} is typing…", self.sender))
    }
}

impl From<TypingPayload> for TypingSignal {
    fn from(payload: TypingPayload) -> Self {
        Self {
            sender: payload.nombre,
            draft: payload.texto,
        }
    }
}

impl From<TypingSignal> for TypingPayload {
    fn from(signal: TypingSignal) -> Self {
        Self {
            nombre: signal.sender,
            texto: signal.draft,
        }
    }
}
