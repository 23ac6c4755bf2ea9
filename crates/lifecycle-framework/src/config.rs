//! # Resource Configuration
//!
//! Where a resource lives and which fallback plans its state-changing
//! operations use. Plans default to the standard verb orders in
//! [`FallbackPlan`]; a service with different quirks overrides them here
//! rather than in client code.

use crate::error::ConfigError;
use crate::plan::FallbackPlan;
use crate::status::Transition;
use serde::{Deserialize, Serialize};
use url::Url;

fn default_owner_segment() -> String {
    "owner".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfig {
    pub base_url: Url,
    /// Segment under which owner-scoped listings live (`{owner_segment}/{ownerId}`).
    #[serde(default = "default_owner_segment")]
    pub owner_segment: String,
    #[serde(default = "FallbackPlan::activate")]
    pub activate: FallbackPlan,
    #[serde(default = "FallbackPlan::deactivate")]
    pub deactivate: FallbackPlan,
    #[serde(default = "FallbackPlan::hard_delete")]
    pub hard_delete: FallbackPlan,
}

impl ResourceConfig {
    pub fn new(base_url: Url) -> Result<Self, ConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }
        Ok(Self {
            base_url,
            owner_segment: default_owner_segment(),
            activate: FallbackPlan::activate(),
            deactivate: FallbackPlan::deactivate(),
            hard_delete: FallbackPlan::hard_delete(),
        })
    }

    pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(url)
    }

    pub fn with_owner_segment(mut self, segment: impl Into<String>) -> Self {
        self.owner_segment = segment.into();
        self
    }

    pub fn with_activate_plan(mut self, plan: FallbackPlan) -> Self {
        self.activate = plan;
        self
    }

    pub fn with_deactivate_plan(mut self, plan: FallbackPlan) -> Self {
        self.deactivate = plan;
        self
    }

    pub fn with_hard_delete_plan(mut self, plan: FallbackPlan) -> Self {
        self.hard_delete = plan;
        self
    }

    pub fn plan_for(&self, transition: Transition) -> &FallbackPlan {
        match transition {
            Transition::Activate => &self.activate,
            Transition::Deactivate => &self.deactivate,
        }
    }
}
