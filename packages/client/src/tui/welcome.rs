//! Welcome step: pick the display name before entering the chat.

use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{domain::DisplayName, error::ClientError};

const PROMPT: &str = "Your name: ";

/// Use `name` when given, otherwise prompt for one.
///
/// Returns `Ok(None)` when the user leaves with Ctrl-C or Ctrl-D.
pub async fn resolve_identity(name: Option<String>) -> Result<Option<DisplayName>, ClientError> {
    if let Some(name) = name {
        return Ok(Some(DisplayName::new(name)?));
    }
    tokio::task::spawn_blocking(prompt_identity).await?
}

fn prompt_identity() -> Result<Option<DisplayName>, ClientError> {
    let mut editor = DefaultEditor::new()?;
    println!("Welcome to Murmur.");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => match DisplayName::new(&line) {
                Ok(name) => return Ok(Some(name)),
                Err(e) => println!("{e}"),
            },
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(e.into()),
        }
    }
}
