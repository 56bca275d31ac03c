//! Failures reported by a completion service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("rate limit or quota exceeded: {0}")]
    RateLimited(String),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    /// Classify a non-success HTTP status from the completion endpoint.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Authentication { status, message },
            429 => Self::RateLimited(message),
            _ => Self::Api { status, message },
        }
    }
}
