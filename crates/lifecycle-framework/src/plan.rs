//! # Fallback Plans
//!
//! Backends disagree on which verb a state-changing endpoint accepts. A
//! [`FallbackPlan`] is an ordered list of `(verb, path)` attempts for one
//! logical operation. The client walks the list and moves to the next attempt
//! **only** when the current one is answered with `405 Method Not Allowed`.
//! Any other outcome, success or failure, is final.
//!
//! Paths are templates relative to the resource base URL. The placeholder
//! `{id}` is replaced by the percent-encoded entity id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder substituted with the entity id when a template is rendered.
pub const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub verb: HttpVerb,
    pub path: String,
}

impl Attempt {
    pub fn new(verb: HttpVerb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
        }
    }

    /// Path segments with the id substituted, raw (not yet encoded).
    pub fn segments<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| if segment == ID_PLACEHOLDER { id } else { segment })
            .collect()
    }
}

/// Ordered verb/path attempts for a single logical operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackPlan {
    attempts: Vec<Attempt>,
}

impl FallbackPlan {
    pub fn new(attempts: Vec<Attempt>) -> Self {
        Self { attempts }
    }

    pub fn single(verb: HttpVerb, path: impl Into<String>) -> Self {
        Self::new(vec![Attempt::new(verb, path)])
    }

    /// Appends another attempt.
    pub fn then(mut self, verb: HttpVerb, path: impl Into<String>) -> Self {
        self.attempts.push(Attempt::new(verb, path));
        self
    }

    /// `PATCH`, then `PUT`, then `POST` on `{id}/{action}`.
    pub fn status_change(action: &str) -> Self {
        let path = format!("{ID_PLACEHOLDER}/{action}");
        Self::single(HttpVerb::Patch, path.clone())
            .then(HttpVerb::Put, path.clone())
            .then(HttpVerb::Post, path)
    }

    pub fn activate() -> Self {
        Self::status_change("activate")
    }

    pub fn deactivate() -> Self {
        Self::status_change("deactivate")
    }

    /// Deactivation for services that treat `DELETE {id}` as a soft delete.
    /// Falls back to the regular `{id}/deactivate` verbs.
    pub fn deactivate_via_delete() -> Self {
        let path = format!("{ID_PLACEHOLDER}/deactivate");
        Self::single(HttpVerb::Delete, ID_PLACEHOLDER)
            .then(HttpVerb::Put, path.clone())
            .then(HttpVerb::Post, path)
    }

    /// `DELETE {id}`, then `POST {id}/delete`.
    pub fn hard_delete() -> Self {
        Self::single(HttpVerb::Delete, ID_PLACEHOLDER)
            .then(HttpVerb::Post, format!("{ID_PLACEHOLDER}/delete"))
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}
