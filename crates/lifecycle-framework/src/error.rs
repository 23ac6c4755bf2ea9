//! # Framework Errors
//!
//! Error types shared by every resource client. Domain crates wrap
//! [`ClientError`] in their own per-resource enums; the framework itself only
//! distinguishes *where* a call failed.

use crate::validation::ValidationError;

/// Why a client operation failed.
///
/// Each variant maps onto the HTTP-ish status code carried by
/// [`ApiResult`](crate::ApiResult), see [`ClientError::status`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),
    /// A 2xx response whose body could not be decoded as required.
    #[error("Error parsing response: {message}")]
    Parse { status: u16, message: String },
}

impl ClientError {
    /// Status code reported alongside this error: 400 for validation, the
    /// response status for HTTP and parse failures, 0 for transport failures.
    pub fn status(&self) -> u16 {
        match self {
            ClientError::Validation(_) => 400,
            ClientError::Http { status, .. } | ClientError::Parse { status, .. } => *status,
            ClientError::Transport(_) => 0,
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(e: TransportError) -> Self {
        ClientError::Transport(e.to_string())
    }
}

/// Failure inside a [`Transport`](crate::Transport) before a response exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("{0}")]
    Other(String),
}

/// Invalid client or service configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("missing environment variable {0}")]
    MissingVar(String),
    #[error("invalid value `{value}` for {name}")]
    InvalidValue { name: String, value: String },
}
