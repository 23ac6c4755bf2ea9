//! # Lifecycle Framework
//!
//! Building blocks for type-safe clients of REST services that manage
//! **lifecycle entities**: records with an id, an Active/Inactive status and
//! timestamps, which are created, updated, activated, deactivated and
//! eventually hard-deleted.
//!
//! ## Why a framework?
//!
//! Services in the same family tend to agree on the *shape* of a lifecycle
//! API and disagree on the details: one accepts `PATCH /{id}/activate`,
//! another only `PUT`, a third only `POST`; one spells a status `"A"`,
//! another `"ACTIVE"`. Writing those quirks into every domain client makes
//! them drift apart. Here they are written **once**:
//!
//! - [`status`] normalizes every wire status at the deserialization boundary.
//! - [`plan`] describes ordered verb fallbacks as data.
//! - [`ResourceClient`] executes reads, writes, plans and bulk calls for any
//!   [`LifecycleEntity`], always resolving to an [`ApiResult`] envelope.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`LifecycleEntity`]): your domain record and its
//!    create/update candidates.
//! 2. **Engine Layer** ([`ResourceClient`]): URL conventions, validation,
//!    fallback plans, error folding.
//! 3. **Transport Layer** ([`Transport`]): the network seam, with
//!    [`ReqwestTransport`] for production and [`mock::MockTransport`] /
//!    [`sandbox::SandboxBackend`] for tests and demos.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lifecycle_framework::{ReqwestTransport, ResourceClient, ResourceConfig};
//! use std::sync::Arc;
//!
//! let config = ResourceConfig::parse("http://localhost:8080/api/documents")?
//!     .with_owner_segment("user");
//! let transport = Arc::new(ReqwestTransport::new(None)?);
//! let documents = ResourceClient::<Document>::new(config, transport);
//!
//! let result = documents.deactivate("42").await;
//! if !result.success {
//!     eprintln!("{}: {:?}", result.status, result.error);
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Clients are `Clone` and stateless between calls, so they can be shared
//!   across tasks freely.
//! - A single logical operation is strictly sequential: fallback attempts and
//!   bulk items are never issued concurrently.
//! - No ordering is guaranteed between independent concurrent calls.
//!
//! ## Testing
//!
//! [`mock::MockTransport`] scripts responses and asserts request order.
//! [`sandbox::SandboxBackend`] is a small stateful backend actor for
//! end-to-end flows.

pub mod bulk;
pub mod client;
pub mod config;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod id;
pub mod mock;
pub mod plan;
pub mod sandbox;
pub mod stats;
pub mod status;
pub mod tracing;
pub mod transport;
pub mod validation;

// Re-export core types for convenience
pub use bulk::{BulkFailure, BulkReport};
pub use client::ResourceClient;
pub use config::ResourceConfig;
pub use entity::LifecycleEntity;
pub use envelope::{Acknowledged, ApiResult, StatusChange};
pub use error::{ClientError, ConfigError, TransportError};
pub use plan::{Attempt, FallbackPlan, HttpVerb};
pub use stats::EntityStats;
pub use status::{normalize_status, EntityStatus, StatusFilter, Transition};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use validation::{is_valid_email, Validate, ValidationError};
