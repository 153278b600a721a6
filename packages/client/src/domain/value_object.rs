//! Value Objects for outbound events.
//!
//! Only what the local user sends is validated; inbound payloads from peers
//! are rendered as received.

use std::fmt;

use super::error::ValueObjectError;

/// Maximum display name length in characters
pub const DISPLAY_NAME_MAX_CHARS: usize = 100;

/// Maximum message body length in characters
pub const MESSAGE_BODY_MAX_CHARS: usize = 10_000;

/// Display name the local user chats under.
///
/// Set once when entering the chat and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed name is empty or longer than
    /// [`DISPLAY_NAME_MAX_CHARS`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValueObjectError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        let len = name.chars().count();
        if len > DISPLAY_NAME_MAX_CHARS {
            return Err(ValueObjectError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX_CHARS,
                actual: len,
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of an outbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    /// Create a new MessageBody. The text is kept verbatim.
    pub fn new(body: impl Into<String>) -> Result<Self, ValueObjectError> {
        let body = body.into();
        if body.is_empty() {
            return Err(ValueObjectError::MessageBodyEmpty);
        }
        let len = body.chars().count();
        if len > MESSAGE_BODY_MAX_CHARS {
            return Err(ValueObjectError::MessageBodyTooLong {
                max: MESSAGE_BODY_MAX_CHARS,
                actual: len,
            });
        }
        Ok(Self(body))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}
