//! Errors that end the client.

use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::{channel::ChannelError, domain::ValueObjectError};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] ChannelError),

    #[error("Invalid display name: {0}")]
    DisplayName(#[from] ValueObjectError),

    #[error("Failed to read display name: {0}")]
    Prompt(#[from] ReadlineError),

    #[error("Prompt task failed: {0}")]
    PromptTask(#[from] tokio::task::JoinError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),
}
