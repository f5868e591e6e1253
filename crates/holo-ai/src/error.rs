//! Error types for holo-ai

use thiserror::Error;

/// Result type alias using holo-ai Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the question-answering endpoint
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent or the response could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response parsed but carried nothing usable
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// The request never produced a response (connect, DNS, TLS, body read).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::InvalidConfig(_))
    }

    /// The endpoint responded, but not with a 2xx status.
    pub fn is_server(&self) -> bool {
        matches!(self, Error::Status { .. })
    }

    /// The endpoint responded with 2xx, but the body was unusable.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Json(_) | Error::UnexpectedResponse(_))
    }
}
