//! Domain error types for the helpers that return `Result` rather than an
//! [`ApiResult`](lifecycle_framework::ApiResult) envelope.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found")]
    NotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("User service error ({status}): {message}")]
    ServiceError { status: u16, message: String },
}

impl UserError {
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => UserError::NotFound,
            400 => UserError::ValidationError(message),
            _ => UserError::ServiceError { status, message },
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DocumentError {
    #[error("Document not found")]
    NotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Document service error ({status}): {message}")]
    ServiceError { status: u16, message: String },
}

impl DocumentError {
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => DocumentError::NotFound,
            400 => DocumentError::ValidationError(message),
            _ => DocumentError::ServiceError { status, message },
        }
    }
}
