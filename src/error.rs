//! Error types for chat submissions and commands.

use thiserror::Error;

/// Input rejected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Nothing to send: type a message or attach an image")]
    EmptyInput,

    #[error("Only images can be attached (got '{0}')")]
    AttachmentNotImage(String),

    #[error("Attachment is {size} bytes, the limit is {max} bytes")]
    AttachmentTooLarge { size: usize, max: usize },

    #[error("Attachment data is not valid base64")]
    AttachmentEncoding,

    #[error("Missing argument. Usage: {usage}")]
    MissingArgument { usage: &'static str },

    #[error("Invalid time: {0}")]
    InvalidTime(String),
}

/// Why a submission or command did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The endpoint could not be reached or returned something unreadable.
    #[error("Could not reach the AI service: {0}")]
    Transport(String),

    /// Non-2xx response.
    #[error("AI service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// 2xx response without a usable candidate.
    #[error("{}", blocked_message(.reason.as_deref()))]
    Blocked { reason: Option<String> },
}

fn blocked_message(reason: Option<&str>) -> String {
    reason.map_or_else(
        || "No response was returned. It may have been filtered for safety.".to_string(),
        |r| format!("Request was blocked: {r}"),
    )
}

impl ChatError {
    /// Process exit code used by the one-shot command.
    pub const fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::Validation(_) => exitcode::DATAERR,
            Self::Transport(_) => exitcode::UNAVAILABLE,
            Self::Api { .. } | Self::Blocked { .. } => exitcode::SOFTWARE,
        }
    }
}
