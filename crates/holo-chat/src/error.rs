//! Error types for holo-chat

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown when the submitted text is empty or whitespace only
pub const VALIDATION_MESSAGE: &str = "Please enter a valid query.";

/// Shown when the endpoint answers with a non-success status
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch response. Please try again.";

/// Shown when the endpoint answers 2xx with an unusable body
pub const PROTOCOL_MESSAGE: &str = "Received an unexpected response. Please try again.";

/// Fallback when a transport failure carries no message of its own
pub const GENERIC_MESSAGE: &str = "Something went wrong.";

/// Category of a failed submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Blank input; no request was made
    Validation,
    /// The request could not be sent or the reply not received
    Transport,
    /// Non-success status code
    Server,
    /// Malformed body or missing `answer`
    Protocol,
}

/// Errors a submission can end in
#[derive(Error, Debug)]
pub enum Error {
    /// Blank input
    #[error("{}", VALIDATION_MESSAGE)]
    EmptyQuery,

    /// An error from the endpoint layer
    #[error(transparent)]
    Ai(#[from] holo_ai::Error),
}

impl Error {
    /// Structured category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyQuery => ErrorKind::Validation,
            Error::Ai(e) if e.is_server() => ErrorKind::Server,
            Error::Ai(e) if e.is_protocol() => ErrorKind::Protocol,
            Error::Ai(_) => ErrorKind::Transport,
        }
    }

    /// Message rendered in the error banner
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Validation => VALIDATION_MESSAGE.to_string(),
            ErrorKind::Server => FETCH_FAILED_MESSAGE.to_string(),
            ErrorKind::Protocol => PROTOCOL_MESSAGE.to_string(),
            ErrorKind::Transport => {
                let message = self.to_string();
                if message.trim().is_empty() {
                    GENERIC_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }
}

/// The error slot of a session: what went wrong and what to show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for LastError {
    fn from(error: &Error) -> Self {
        Self {
            kind: error.kind(),
            message: error.user_message(),
        }
    }
}
