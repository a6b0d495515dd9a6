//! Committee roster types shared between the roster source, the reconciler,
//! and the destination store.

use serde::{Deserialize, Serialize};

/// A person named on the roster, as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    pub full_name: String,
}

impl PersonRef {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }
}

/// A committee as reported by the roster API for the current session.
///
/// Rebuilt on every run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCommittee {
    pub name: String,
    #[serde(default)]
    pub chair: Option<PersonRef>,
    /// Member order is significant: it becomes the order of `committee-members`.
    #[serde(default)]
    pub members: Vec<PersonRef>,
}

/// An existing person record in the destination store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPerson {
    pub id: String,
    pub display_name: String,
    pub chamber_tag: String,
}

/// An existing committee record in the destination store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationCommittee {
    pub id: String,
    pub display_name: String,
    pub chamber_tag: String,
}

/// The `fieldData` payload written for one committee.
///
/// `member_count` always equals `member_ids.len()`; use
/// [`CommitteeFields::new`] rather than building the struct by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommitteeFields {
    pub name: String,
    pub slug: String,
    pub chamber: String,
    pub description: String,
    pub committee_members: Vec<String>,
    pub member_count: usize,
    pub committee_url: String,
    /// Serialised as JSON `null` when the roster names no chair.
    pub chair: Option<String>,
    pub meeting_schedule: String,
}

impl CommitteeFields {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        slug: String,
        chamber: String,
        description: String,
        committee_members: Vec<String>,
        committee_url: String,
        chair: Option<String>,
        meeting_schedule: String,
    ) -> Self {
        let member_count = committee_members.len();
        Self {
            name,
            slug,
            chamber,
            description,
            committee_members,
            member_count,
            committee_url,
            chair,
            meeting_schedule,
        }
    }
}

/// The write a [`ReconciliationResult`] asks the orchestrator to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteAction<'a> {
    Create,
    Update(&'a str),
}

/// Create-or-update decision for one source committee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// `None` means no existing committee matched and a new record is created.
    pub target_committee_id: Option<String>,
    pub payload: CommitteeFields,
    /// Roster names that resolved to no destination person, in roster order.
    pub unmatched_members: Vec<String>,
}

impl ReconciliationResult {
    pub fn action(&self) -> WriteAction<'_> {
        match &self.target_committee_id {
            Some(id) => WriteAction::Update(id),
            None => WriteAction::Create,
        }
    }
}
