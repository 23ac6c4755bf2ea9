//! # LifecycleEntity Trait
//!
//! The contract every managed record (a user, a document, ...) implements so
//! that one generic [`ResourceClient`](crate::ResourceClient) can drive its
//! whole lifecycle. The trait fixes:
//!
//! - the candidate payloads accepted on create and update (associated types
//!   [`LifecycleEntity::Create`] and [`LifecycleEntity::Update`]),
//! - how the record exposes its id and status,
//! - the three named transitions a record goes through locally: Activate,
//!   Deactivate and Update-fields.
//!
//! # Provided Methods
//!
//! Only the accessors and [`LifecycleEntity::on_update`] are required. The
//! transition helpers are provided and always bump the modification
//! timestamp, so implementors cannot forget to.

use crate::status::{EntityStatus, Transition};
use crate::validation::Validate;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

pub trait LifecycleEntity:
    Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Candidate payload for creating a record.
    type Create: Validate + Serialize + Debug + Send + Sync;

    /// Candidate payload for updating an existing record.
    type Update: Validate + Serialize + Debug + Send + Sync;

    /// Server-assigned id; `None` until the record has been persisted.
    fn id(&self) -> Option<&str>;

    fn status(&self) -> EntityStatus;

    fn set_status(&mut self, status: EntityStatus);

    fn touch(&mut self, at: DateTime<Utc>);

    /// Merges an update candidate into this record.
    fn on_update(&mut self, update: Self::Update);

    fn is_active(&self) -> bool {
        self.status().is_active()
    }

    /// Applies a status transition. Idempotent on the status itself; the
    /// modification time always moves.
    fn transition(mut self, transition: Transition) -> Self
    where
        Self: Sized,
    {
        self.set_status(transition.target());
        self.touch(Utc::now());
        self
    }

    fn activate(self) -> Self
    where
        Self: Sized,
    {
        self.transition(Transition::Activate)
    }

    fn deactivate(self) -> Self
    where
        Self: Sized,
    {
        self.transition(Transition::Deactivate)
    }

    fn update_fields(mut self, update: Self::Update) -> Self
    where
        Self: Sized,
    {
        self.on_update(update);
        self.touch(Utc::now());
        self
    }
}

/// Short type name used as the `entity_type` log field.
pub(crate) fn entity_type<T>() -> &'static str {
    std::any::type_name::<T>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}
