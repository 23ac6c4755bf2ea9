//! # Result Envelope
//!
//! Every client operation resolves to an [`ApiResult`] instead of a `Result`.
//! Callers never see a panic or a propagated error from a client: transport,
//! HTTP and decoding failures are all folded into the envelope's `error`
//! and `status` fields.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};

/// Outcome of one client operation.
///
/// `status` is the HTTP status of the final response, 400 for a local
/// validation failure, or 0 when no response was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: u16,
    pub success: bool,
}

impl<T> ApiResult<T> {
    /// Builds an envelope whose `success` flag follows the status code.
    pub fn new(data: Option<T>, error: Option<String>, status: u16) -> Self {
        Self {
            data,
            error,
            status,
            success: (200..300).contains(&status),
        }
    }

    pub fn ok(status: u16, data: T) -> Self {
        Self::new(Some(data), None, status)
    }

    /// A success produced locally, e.g. from a fallback path that had no
    /// server payload to report.
    pub fn synthesized(data: T) -> Self {
        Self::ok(200, data)
    }

    /// Folds a failure into the envelope. Always unsuccessful, including a
    /// 2xx response whose body could not be decoded.
    pub fn failure(error: &ClientError) -> Self {
        Self {
            data: None,
            error: Some(error.to_string()),
            status: error.status(),
            success: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResult<U> {
        ApiResult {
            data: self.data.map(f),
            error: self.error,
            status: self.status,
            success: self.success,
        }
    }

    /// Successful payload, if any.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

impl<T> From<Result<(u16, T), ClientError>> for ApiResult<T> {
    fn from(result: Result<(u16, T), ClientError>) -> Self {
        match result {
            Ok((status, data)) => ApiResult::ok(status, data),
            Err(e) => ApiResult::failure(&e),
        }
    }
}

/// Success marker used when a mutating endpoint answers without a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledged {
    pub success: bool,
}

impl Default for Acknowledged {
    fn default() -> Self {
        Self { success: true }
    }
}

/// Payload of a status change: the updated entity when the service returned
/// one, otherwise a bare acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusChange<T> {
    Entity(T),
    Acknowledged(Acknowledged),
}

impl<T> StatusChange<T> {
    pub fn entity(&self) -> Option<&T> {
        match self {
            StatusChange::Entity(entity) => Some(entity),
            StatusChange::Acknowledged(_) => None,
        }
    }

    pub fn into_entity(self) -> Option<T> {
        match self {
            StatusChange::Entity(entity) => Some(entity),
            StatusChange::Acknowledged(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_success_follows_status() {
        assert!(ApiResult::ok(201, 1).success);
        assert!(!ApiResult::<i32>::new(None, Some("gone".into()), 404).success);
        assert!(ApiResult::<i32>::new(None, None, 204).success);
    }

    #[test]
    fn test_failure_carries_error_status() {
        let result: ApiResult<i32> = ApiResult::failure(&ClientError::from(
            ValidationError::Required("id"),
        ));
        assert_eq!(result.status, 400);
        assert_eq!(result.error.as_deref(), Some("id is required"));
        assert!(result.data.is_none());

        let parse = ClientError::Parse {
            status: 200,
            message: "expected value".into(),
        };
        let result: ApiResult<i32> = ApiResult::failure(&parse);
        assert_eq!(result.status, 200);
        assert!(!result.success);
    }

    #[test]
    fn test_status_change_serializes_acknowledgement() {
        let ack: StatusChange<i32> = StatusChange::Acknowledged(Acknowledged::default());
        assert_eq!(serde_json::to_string(&ack).unwrap(), r#"{"success":true}"#);
        assert_eq!(ack.entity(), None);
    }
}
