//! Aggregate counts for a resource.

use crate::entity::LifecycleEntity;
use serde::{Deserialize, Serialize};

/// `total == active + inactive` whenever computed locally.
///
/// All three counters are required on the wire; a body missing any of
/// them is not a stats body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl EntityStats {
    pub fn from_entities<T: LifecycleEntity>(entities: &[T]) -> Self {
        let active = entities.iter().filter(|e| e.is_active()).count();
        Self {
            total: entities.len(),
            active,
            inactive: entities.len() - active,
        }
    }
}
