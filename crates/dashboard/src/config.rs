//! # Dashboard Configuration
//!
//! Where the two services live and how their lifecycle routes behave.
//!
//! | Variable                          | Meaning                                  |
//! |-----------------------------------|------------------------------------------|
//! | `DASHBOARD_USERS_URL`             | users resource root (required)           |
//! | `DASHBOARD_DOCUMENTS_URL`         | documents resource root (required)       |
//! | `DASHBOARD_TIMEOUT_SECS`          | per-request timeout in seconds           |
//! | `DASHBOARD_DEACTIVATE_VIA_DELETE` | documents deactivate with `DELETE /{id}` |
//!
//! A `.env` file in the working directory is loaded first when present.

use lifecycle_framework::{ConfigError, FallbackPlan, ResourceConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const USERS_URL_VAR: &str = "DASHBOARD_USERS_URL";
pub const DOCUMENTS_URL_VAR: &str = "DASHBOARD_DOCUMENTS_URL";
pub const TIMEOUT_VAR: &str = "DASHBOARD_TIMEOUT_SECS";
pub const DEACTIVATE_VIA_DELETE_VAR: &str = "DASHBOARD_DEACTIVATE_VIA_DELETE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub users: ResourceConfig,
    pub documents: ResourceConfig,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl DashboardConfig {
    /// Default routing for both services: users restore through
    /// `/{id}/restore`, documents are owned under `/user/{userId}`.
    pub fn new(users_url: &str, documents_url: &str) -> Result<Self, ConfigError> {
        let users = ResourceConfig::parse(users_url)?
            .with_activate_plan(FallbackPlan::status_change("restore"));
        let documents = ResourceConfig::parse(documents_url)?.with_owner_segment("user");
        Ok(Self {
            users,
            documents,
            timeout_secs: None,
        })
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Reads the process environment after loading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
        };
        let mut config = Self::new(&required(USERS_URL_VAR)?, &required(DOCUMENTS_URL_VAR)?)?;

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: TIMEOUT_VAR.to_string(),
                value: raw.clone(),
            })?;
            config = config.with_timeout_secs(secs);
        }

        if let Some(raw) = lookup(DEACTIVATE_VIA_DELETE_VAR) {
            if parse_flag(DEACTIVATE_VIA_DELETE_VAR, &raw)? {
                config.documents = config
                    .documents
                    .with_deactivate_plan(FallbackPlan::deactivate_via_delete());
            }
        }

        Ok(config)
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}
