//! # Dashboard Library
//!
//! Domain layer of the administrative dashboard: users and their documents,
//! managed through the lifecycle framework.
//!
//! ## Core Components
//!
//! - **[model]**: [`User`](model::User) and [`UserDocument`](model::UserDocument) with their create/update payloads.
//! - **[clients]**: [`UserClient`](clients::UserClient) and [`DocumentClient`](clients::DocumentClient), sharing the [`EntityClient`](clients::EntityClient) operations.
//! - **[config]**: [`DashboardConfig`](config::DashboardConfig), loaded from the environment.
//! - **[lifecycle]**: [`DashboardSystem`](lifecycle::DashboardSystem), which wires everything together.
//!
//! ## Testing
//!
//! See [`lifecycle_framework::mock`] for scripting responses and
//! [`DashboardSystem::sandbox`](lifecycle::DashboardSystem::sandbox) for
//! stateful end-to-end runs.

pub mod clients;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod model;
