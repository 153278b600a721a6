//! Domain layer for the chat client.
//!
//! Messages and typing signals as the client sees them, independent of
//! the wire representation.

pub mod error;
pub mod message;
pub mod value_object;

pub use error::ValueObjectError;
pub use message::{ChatMessage, TypingSignal};
pub use value_object::{DisplayName, MESSAGE_BODY_MAX_CHARS, MessageBody};
