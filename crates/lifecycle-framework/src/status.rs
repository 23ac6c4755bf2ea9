//! # Entity Status
//!
//! The single source of truth for Active/Inactive semantics. Remote services
//! disagree on how they spell a status (`"A"`, `"ACTIVE"`, `"I"`,
//! `"INACTIVE"`), so every wire value is normalized exactly once, at the
//! deserialization boundary, into [`EntityStatus`]. Nothing else in the
//! workspace compares raw status strings.
//!
//! Normalization is **fail-closed**: a missing or unrecognized value becomes
//! [`EntityStatus::Inactive`], so a record whose state cannot be determined
//! never shows up in an "active only" listing.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Canonical lifecycle status of a managed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityStatus {
    Active,
    #[default]
    Inactive,
}

impl EntityStatus {
    /// Wire code sent back to the services (`"A"` / `"I"`).
    pub fn code(self) -> &'static str {
        match self {
            EntityStatus::Active => "A",
            EntityStatus::Inactive => "I",
        }
    }

    pub fn is_active(self) -> bool {
        self == EntityStatus::Active
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityStatus::Active => write!(f, "Active"),
            EntityStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

/// Maps any wire representation onto a canonical status.
///
/// `"A"` and `"ACTIVE"` are active. Everything else, including `None`, is
/// inactive.
pub fn normalize_status(raw: Option<&str>) -> EntityStatus {
    match raw.map(str::trim) {
        Some("A") | Some("ACTIVE") => EntityStatus::Active,
        _ => EntityStatus::Inactive,
    }
}

impl Serialize for EntityStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for EntityStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StatusVisitor)
    }
}

/// Accepts any JSON scalar so that a malformed status degrades to
/// `Inactive` instead of failing the whole record.
struct StatusVisitor;

impl<'de> Visitor<'de> for StatusVisitor {
    type Value = EntityStatus;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a status code")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<EntityStatus, E> {
        Ok(normalize_status(Some(v)))
    }

    fn visit_none<E: de::Error>(self) -> Result<EntityStatus, E> {
        Ok(EntityStatus::Inactive)
    }

    fn visit_unit<E: de::Error>(self) -> Result<EntityStatus, E> {
        Ok(EntityStatus::Inactive)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<EntityStatus, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<EntityStatus, E> {
        Ok(EntityStatus::Inactive)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<EntityStatus, E> {
        Ok(EntityStatus::Inactive)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<EntityStatus, E> {
        Ok(EntityStatus::Inactive)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<EntityStatus, E> {
        Ok(EntityStatus::Inactive)
    }
}

/// The two named status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Activate,
    Deactivate,
}

impl Transition {
    /// Status an entity holds after the transition, whatever it held before.
    pub fn target(self) -> EntityStatus {
        match self {
            Transition::Activate => EntityStatus::Active,
            Transition::Deactivate => EntityStatus::Inactive,
        }
    }

    /// Path segment conventionally used for the transition endpoint.
    pub fn action(self) -> &'static str {
        match self {
            Transition::Activate => "activate",
            Transition::Deactivate => "deactivate",
        }
    }
}

/// Status filter for search and listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// Query-string value, or `None` when the filter should be omitted.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(EntityStatus::Active.code()),
            StatusFilter::Inactive => Some(EntityStatus::Inactive.code()),
        }
    }

    pub fn matches(self, status: EntityStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status.is_active(),
            StatusFilter::Inactive => !status.is_active(),
        }
    }
}
