//! # Mock Transport & Testing Guide
//!
//! [`MockTransport`] implements [`Transport`] with a FIFO queue of scripted
//! responses. It lets you unit-test client logic (fallback order, error
//! mapping, bulk reports) deterministically and without a network.
//!
//! ## When to use which backend
//!
//! | Feature | MockTransport | SandboxBackend | ReqwestTransport |
//! |---------|---------------|----------------|------------------|
//! | **State** | None (scripted) | Real in-memory store | Remote service |
//! | **Asserts request order** | Yes | No | No |
//! | **Error injection** | Any status or transport failure | 405 per verb | Whatever the server does |
//! | **Use case** | Unit tests of one operation | End-to-end flows | Production |
//!
//! ## Example
//!
//! ```rust,ignore
//! let mock = MockTransport::new();
//! mock.expect(HttpVerb::Patch, "/api/docs/7/activate").respond(405);
//! mock.expect(HttpVerb::Put, "/api/docs/7/activate").respond(204);
//!
//! let client = ResourceClient::<Doc>::new(config, mock.transport());
//! let result = client.activate("7").await;
//!
//! assert!(result.success);
//! mock.verify(); // every expectation consumed, nothing unexpected
//! ```
//!
//! A request that does not match the head of the queue is answered with a
//! [`TransportError`] and remembered, so [`MockTransport::verify`] fails.

use crate::error::TransportError;
use crate::plan::HttpVerb;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// A request as the mock saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub verb: HttpVerb,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<serde_json::Value>,
}

struct Expectation {
    verb: HttpVerb,
    path: String,
    response: Result<HttpResponse, TransportError>,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    requests: Vec<RecordedRequest>,
    unexpected: Vec<String>,
}

/// Scripted transport with expectation tracking.
///
/// Clones share the same queue and request log, so a test can keep one
/// handle for assertions while the client owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// This mock as a shareable transport for a client.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Queues an expected request. `path` is matched against the URL path
    /// exactly, in its percent-encoded form.
    pub fn expect(&self, verb: HttpVerb, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            verb,
            path: path.into(),
            state: Arc::clone(&self.state),
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Panics if expectations remain or an unexpected request arrived.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.unexpected.is_empty() {
            panic!("Unexpected requests: {}", state.unexpected.join(", "));
        }
        if !state.expectations.is_empty() {
            let remaining: Vec<String> = state
                .expectations
                .iter()
                .map(|e| format!("{} {}", e.verb, e.path))
                .collect();
            panic!(
                "Not all expectations were met. {} remaining: {}",
                remaining.len(),
                remaining.join(", ")
            );
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let recorded = RecordedRequest {
            verb: request.verb,
            path: request.url.path().to_string(),
            query: request.url.query().map(str::to_string),
            body: request.body,
        };

        let mut state = self.lock();
        state.requests.push(recorded.clone());

        let matches = state
            .expectations
            .front()
            .is_some_and(|e| e.verb == recorded.verb && e.path == recorded.path);
        if matches {
            if let Some(expectation) = state.expectations.pop_front() {
                return expectation.response;
            }
        }

        let description = format!("{} {}", recorded.verb, recorded.path);
        warn!(request = %description, "Unexpected request");
        state.unexpected.push(description.clone());
        Err(TransportError::Other(format!("unexpected request {description}")))
    }
}

/// Builder for the response to one expected request.
pub struct ExpectationBuilder {
    verb: HttpVerb,
    path: String,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// Responds with `status` and an empty body.
    pub fn respond(self, status: u16) {
        self.push(Ok(HttpResponse::empty(status)));
    }

    pub fn respond_json<B: Serialize>(self, status: u16, body: &B) {
        let bytes = serde_json::to_vec(body).unwrap_or_default();
        self.push(Ok(HttpResponse::new(status, bytes)));
    }

    pub fn respond_body(self, status: u16, body: impl Into<Vec<u8>>) {
        self.push(Ok(HttpResponse::new(status, body)));
    }

    /// Fails the request without a response.
    pub fn fail(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<HttpResponse, TransportError>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.expectations.push_back(Expectation {
            verb: self.verb,
            path: self.path,
            response,
        });
    }
}
