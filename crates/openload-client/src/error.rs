//! Client error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the Openload client
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied arguments violate a precondition; no request was sent
    #[error("validation error: {0}")]
    Validation(String),

    /// The API answered with a non-200 envelope status
    #[error("api error ({status}): {message}")]
    Api { status: i64, message: String },

    /// Network-level failure or malformed response body
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The upload endpoint returned a zero-length body
    #[error("empty response from upload endpoint")]
    EmptyResponse,

    /// Local file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Transport(Box::new(err))
    }
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// The envelope status when the API rejected the request
    pub fn api_status(&self) -> Option<i64> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
