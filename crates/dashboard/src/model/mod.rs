//! Wire-level records implementing [`LifecycleEntity`](lifecycle_framework::LifecycleEntity).

pub mod document;
pub mod user;

pub use document::*;
pub use user::*;
