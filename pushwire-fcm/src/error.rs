//! FCM client error types.

use thiserror::Error;

/// Result type for FCM operations.
pub type Result<T> = std::result::Result<T, FcmError>;

/// FCM client errors.
///
/// Every error is handed back to the caller as-is. Nothing here is retried
/// and nothing is logged above `debug` level.
#[derive(Debug, Error)]
pub enum FcmError {
    /// The message has no payload data (unset or JSON `null`).
    #[error("data is empty")]
    EmptyData,

    /// The recipient list is longer than the service accepts.
    #[error("too many registration ids: {count} exceeds limit of {limit}")]
    TooManyRecipients {
        /// Number of registration ids on the message.
        count: usize,
        /// Maximum allowed per send.
        limit: usize,
    },

    /// The send endpoint answered with something other than 200 OK.
    #[error("unexpected status: {status} {reason}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    /// DNS, connect, TLS or timeout failure in the underlying transport.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The message or payload could not be encoded as JSON.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// A configured endpoint is not a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Strict correlation found a different number of results than recipients.
    #[error("result count mismatch: sent {expected} registration ids, got {actual} results")]
    ResultCountMismatch {
        /// Registration ids retained from the send.
        expected: usize,
        /// Results returned by the service.
        actual: usize,
    },
}

impl FcmError {
    /// Check if this error was raised by local validation, before any request.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyData | Self::TooManyRecipients { .. })
    }

    /// Check if this error came from the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Get the HTTP status code, if the error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
