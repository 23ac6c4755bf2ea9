//! # System Lifecycle
//!
//! Builds the dashboard's clients and the backends they talk to, and tears
//! them down again.
//!
//! ## The DashboardSystem Pattern
//!
//! [`DashboardSystem`] is the single place where transports, configuration
//! and domain clients meet:
//!
//! ```rust,ignore
//! // Against the real services
//! let system = DashboardSystem::connect(DashboardConfig::from_env()?)?;
//!
//! // Against in-memory backends (demo binary, end-to-end tests)
//! let system = DashboardSystem::sandbox()?;
//!
//! let created = system.document_client.create_document(&draft).await;
//! system.shutdown().await?;
//! ```
//!
//! ## Graceful Shutdown
//!
//! Sandbox backends are actors that stop when every sender is gone:
//!
//! 1. **Drop all clients** - each client holds the only senders to its backend
//! 2. **Backends detect closure** - `receiver.recv()` returns `None`
//! 3. **Await completion** - the stored join handles are awaited
//!
//! A system built with [`DashboardSystem::connect`] holds no background
//! tasks, so shutting it down only drops the clients.
//!
//! ## Observability
//!
//! Call [`lifecycle_framework::tracing::setup_tracing`] once at startup;
//! `RUST_LOG=debug` shows every request and fallback step.

pub mod dashboard_system;

pub use dashboard_system::*;
