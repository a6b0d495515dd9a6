//! Explicit run configuration.
//!
//! Built once by the caller and handed to the [`Orchestrator`](crate::Orchestrator);
//! nothing in this crate reads the process environment.

use std::time::Duration;

use rollcall_core::ReconcileConfig;

use crate::error::ConfigError;

pub const DEFAULT_DESTINATION_API_BASE: &str = "https://api.webflow.com/v2";
pub const DEFAULT_PEOPLE_COLLECTION: &str = "685b53f6cef66d01abebd142";
pub const DEFAULT_COMMITTEES_COLLECTION: &str = "685b53da44d49ae626f23712";
pub const DEFAULT_ACCEPT_VERSION: &str = "1.0.0";
pub const DEFAULT_PAGE_SIZE: usize = 100;

pub const DEFAULT_ROSTER_API_BASE: &str = "https://legislation.nysenate.gov/api/3";
pub const DEFAULT_SESSION: u16 = 2025;

/// Delay between consecutive committee writes.
pub const DEFAULT_PACE: Duration = Duration::from_millis(200);

/// Destination CMS collections and credentials.
#[derive(Debug, Clone)]
pub struct DestinationConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub people_collection: String,
    pub committees_collection: String,
    pub page_size: usize,
    pub accept_version: String,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_DESTINATION_API_BASE.to_string(),
            token: None,
            people_collection: DEFAULT_PEOPLE_COLLECTION.to_string(),
            committees_collection: DEFAULT_COMMITTEES_COLLECTION.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            accept_version: DEFAULT_ACCEPT_VERSION.to_string(),
        }
    }
}

impl DestinationConfig {
    /// The bearer token, once [`SyncConfig::validate`] has passed.
    pub fn token(&self) -> Result<&str, ConfigError> {
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ConfigError::Missing("WEBFLOW_API_TOKEN")),
        }
    }
}

/// Legislative roster API.
#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub api_base: String,
    /// Without a key the run uses the embedded fallback roster.
    pub api_key: Option<String>,
    pub session: u16,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_ROSTER_API_BASE.to_string(),
            api_key: None,
            session: DEFAULT_SESSION,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub destination: DestinationConfig,
    pub roster: RosterConfig,
    pub pace: Duration,
    /// Reconcile and report without writing to the destination store.
    pub dry_run: bool,
    pub reconcile: ReconcileConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            destination: DestinationConfig::default(),
            roster: RosterConfig::default(),
            pace: DEFAULT_PACE,
            dry_run: false,
            reconcile: ReconcileConfig::default(),
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.destination.token()?;
        if self.destination.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page size",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
