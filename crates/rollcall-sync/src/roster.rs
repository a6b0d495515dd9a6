//! HTTP client for the legislative roster API.

use async_trait::async_trait;
use rollcall_core::{PersonRef, SourceCommittee};
use serde::Deserialize;
use tracing::info;

use crate::config::RosterConfig;
use crate::store::RosterSource;
use crate::SyncError;

/// Roster chamber value kept by [`RosterClient`].
pub const SENATE_CHAMBER: &str = "SENATE";

/// Fetches committee rosters for one legislative session.
pub struct RosterClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    session: u16,
}

#[derive(Deserialize)]
struct RosterResponse {
    #[serde(default)]
    success: bool,
    result: Option<RosterResult>,
}

#[derive(Deserialize)]
struct RosterResult {
    #[serde(default)]
    items: Vec<RosterCommittee>,
}

#[derive(Deserialize)]
struct RosterCommittee {
    name: String,
    #[serde(default)]
    chamber: String,
    #[serde(default)]
    chair: Option<PersonRef>,
    #[serde(default)]
    members: Vec<PersonRef>,
}

impl RosterClient {
    pub fn new(config: &RosterConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            session: config.session,
        }
    }

    /// Pull the session's committees and keep the Senate ones.
    ///
    /// An unsuccessful or empty payload yields an empty list rather than an
    /// error; the caller decides whether to fall back.
    pub async fn pull_committees(&self) -> Result<Vec<SourceCommittee>, SyncError> {
        let key = self.api_key.as_deref().ok_or(SyncError::MissingApiKey)?;
        let url = format!("{}/committees/{}", self.base_url, self.session);

        info!(url = %url, session = self.session, "pulling committees from roster API");
        let resp = self
            .client
            .get(&url)
            .query(&[("key", key), ("full", "true")])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body: RosterResponse = resp.json().await?;
        let items = match body.result {
            Some(result) if body.success => result.items,
            _ => Vec::new(),
        };
        let committees: Vec<SourceCommittee> = items
            .into_iter()
            .filter(|c| c.chamber == SENATE_CHAMBER)
            .map(|c| SourceCommittee {
                name: c.name,
                chair: c.chair,
                members: c.members,
            })
            .collect();
        info!(count = committees.len(), "pulled Senate committees");
        Ok(committees)
    }
}

#[async_trait]
impl RosterSource for RosterClient {
    async fn fetch_committees(&self) -> Result<Vec<SourceCommittee>, SyncError> {
        self.pull_committees().await
    }
}
