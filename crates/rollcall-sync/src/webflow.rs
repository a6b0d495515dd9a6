//! HTTP client for the destination CMS collections.
//!
//! Reads page through `GET /collections/{id}/items?limit&offset` until a short
//! or empty page. Writes go to the live item endpoints so changes publish
//! immediately.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use rollcall_core::{CommitteeFields, DestinationCommittee, DestinationPerson};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DestinationConfig;
use crate::error::ConfigError;
use crate::store::CommitteeStore;
use crate::SyncError;

/// CMS client scoped to one people collection and one committee collection.
pub struct WebflowClient {
    client: reqwest::Client,
    base_url: String,
    people_collection: String,
    committees_collection: String,
    page_size: usize,
}

#[derive(Deserialize)]
struct ItemsPage<F> {
    #[serde(default = "Vec::new")]
    items: Vec<Item<F>>,
}

#[derive(Deserialize)]
struct Item<F> {
    id: String,
    #[serde(rename = "fieldData")]
    field_data: F,
}

/// The subset of person and committee fields used for matching.
#[derive(Deserialize)]
struct NamedFields {
    #[serde(default)]
    name: String,
    #[serde(default)]
    chamber: Option<String>,
}

#[derive(Serialize)]
struct WriteBody<'a> {
    #[serde(rename = "fieldData")]
    field_data: &'a CommitteeFields,
}

impl WebflowClient {
    /// Build a client with the bearer token and API version baked into
    /// default headers.
    pub fn new(config: &DestinationConfig) -> Result<Self, SyncError> {
        let token = config.token()?;

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ConfigError::Invalid {
                field: "destination token",
                reason: "not a valid header value".into(),
            }
        })?;
        headers.insert(AUTHORIZATION, auth);
        let version = HeaderValue::from_str(&config.accept_version).map_err(|_| {
            ConfigError::Invalid {
                field: "accept-version",
                reason: "not a valid header value".into(),
            }
        })?;
        headers.insert(HeaderName::from_static("accept-version"), version);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            people_collection: config.people_collection.clone(),
            committees_collection: config.committees_collection.clone(),
            page_size: config.page_size.max(1),
        })
    }

    /// Read every item of a collection.
    async fn pull_all<F: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<Item<F>>, SyncError> {
        let url = format!("{}/collections/{}/items", self.base_url, collection);
        let mut items = Vec::new();
        let mut offset = 0usize;

        loop {
            debug!(url = %url, offset, limit = self.page_size, "pulling page");
            let resp = self
                .client
                .get(&url)
                .query(&[("limit", self.page_size), ("offset", offset)])
                .send()
                .await?;
            let page: ItemsPage<F> = check(resp).await?.json().await?;

            let len = page.items.len();
            items.extend(page.items);
            if len < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        info!(collection, count = items.len(), "pulled collection");
        Ok(items)
    }

    fn committee_url(&self, suffix: &str) -> String {
        format!(
            "{}/collections/{}/items{}",
            self.base_url, self.committees_collection, suffix
        )
    }
}

#[async_trait]
impl CommitteeStore for WebflowClient {
    async fn list_people(&self) -> Result<Vec<DestinationPerson>, SyncError> {
        let items: Vec<Item<NamedFields>> = self.pull_all(&self.people_collection).await?;
        Ok(items
            .into_iter()
            .map(|item| DestinationPerson {
                id: item.id,
                display_name: item.field_data.name,
                chamber_tag: item.field_data.chamber.unwrap_or_default(),
            })
            .collect())
    }

    async fn list_committees(&self) -> Result<Vec<DestinationCommittee>, SyncError> {
        let items: Vec<Item<NamedFields>> = self.pull_all(&self.committees_collection).await?;
        Ok(items
            .into_iter()
            .map(|item| DestinationCommittee {
                id: item.id,
                display_name: item.field_data.name,
                chamber_tag: item.field_data.chamber.unwrap_or_default(),
            })
            .collect())
    }

    async fn create_committee(&self, fields: &CommitteeFields) -> Result<(), SyncError> {
        let url = self.committee_url("/live");
        info!(name = %fields.name, members = fields.member_count, "creating committee");
        let resp = self
            .client
            .post(&url)
            .json(&WriteBody { field_data: fields })
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn update_committee(&self, id: &str, fields: &CommitteeFields) -> Result<(), SyncError> {
        let url = self.committee_url(&format!("/{id}/live"));
        info!(name = %fields.name, id, members = fields.member_count, "updating committee");
        let resp = self
            .client
            .patch(&url)
            .json(&WriteBody { field_data: fields })
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into [`SyncError::Server`].
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SyncError::Server {
        status: status.as_u16(),
        body,
    })
}
