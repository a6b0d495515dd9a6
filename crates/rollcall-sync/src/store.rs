//! Seams between the orchestrator and the network.

use async_trait::async_trait;
use rollcall_core::{CommitteeFields, DestinationCommittee, DestinationPerson, SourceCommittee};

use crate::SyncError;

/// Source of the authoritative committee roster.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Senate committees for the configured session, in roster order.
    async fn fetch_committees(&self) -> Result<Vec<SourceCommittee>, SyncError>;
}

/// The destination collection store.
///
/// `list_*` return full snapshots, paginated to completion. Writes go to the
/// live (published) item endpoints.
#[async_trait]
pub trait CommitteeStore: Send + Sync {
    async fn list_people(&self) -> Result<Vec<DestinationPerson>, SyncError>;

    async fn list_committees(&self) -> Result<Vec<DestinationCommittee>, SyncError>;

    async fn create_committee(&self, fields: &CommitteeFields) -> Result<(), SyncError>;

    async fn update_committee(&self, id: &str, fields: &CommitteeFields) -> Result<(), SyncError>;
}
