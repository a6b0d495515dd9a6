//! Create-or-update reconciliation of one roster committee against the
//! destination store snapshots.
//!
//! [`Reconciler::reconcile`] performs no I/O and depends only on its inputs,
//! so re-running it against unchanged snapshots yields the same payload and
//! repeated syncs converge.

use crate::committee::{
    CommitteeFields, DestinationCommittee, DestinationPerson, ReconciliationResult,
    SourceCommittee,
};
use crate::matcher::NameMatcher;
use crate::slug::FieldTemplate;

/// Chamber option id of Senate records in the people collection.
pub const SENATE_PERSON_CHAMBER: &str = "521c1f841fd6e3d287eb931549560714";

/// Chamber option id of Senate records in the committee collection.
pub const SENATE_COMMITTEE_CHAMBER: &str = "4ee88a351849b8218064c06630fa0bc9";

/// Placeholder written to `meeting-schedule`; no schedule data is modelled.
pub const MEETING_SCHEDULE: &str = "As scheduled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Scopes member matching in the people snapshot.
    pub person_chamber: String,
    /// Written into every payload and scopes committee matching.
    pub committee_chamber: String,
    pub fields: FieldTemplate,
    pub meeting_schedule: String,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            person_chamber: SENATE_PERSON_CHAMBER.to_string(),
            committee_chamber: SENATE_COMMITTEE_CHAMBER.to_string(),
            fields: FieldTemplate::default(),
            meeting_schedule: MEETING_SCHEDULE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    config: ReconcileConfig,
    matcher: NameMatcher,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReconcileConfig::default())
    }
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        let matcher = NameMatcher::new(config.person_chamber.clone());
        Self { config, matcher }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn matcher(&self) -> &NameMatcher {
        &self.matcher
    }

    /// Decide create vs. update for `committee` and assemble its payload.
    ///
    /// Unresolved members are left out of `committee-members` and listed in
    /// `unmatched_members`. A member named twice on the roster is matched and
    /// appended twice.
    pub fn reconcile(
        &self,
        committee: &SourceCommittee,
        people: &[DestinationPerson],
        committees: &[DestinationCommittee],
    ) -> ReconciliationResult {
        let mut member_ids = Vec::with_capacity(committee.members.len());
        let mut unmatched_members = Vec::new();
        for member in &committee.members {
            match self.matcher.match_id(&member.full_name, people) {
                Some(id) => member_ids.push(id.to_string()),
                None => unmatched_members.push(member.full_name.clone()),
            }
        }

        let slug = self.config.fields.build_fields(&committee.name);
        let payload = CommitteeFields::new(
            committee.name.clone(),
            slug.slug,
            self.config.committee_chamber.clone(),
            format!("Senate committee: {}", committee.name),
            member_ids,
            slug.url,
            committee.chair.as_ref().map(|c| c.full_name.clone()),
            self.config.meeting_schedule.clone(),
        );

        ReconciliationResult {
            target_committee_id: self.existing_committee(&committee.name, committees),
            payload,
            unmatched_members,
        }
    }

    /// Reconcile every committee, preserving input order.
    pub fn reconcile_all(
        &self,
        source: &[SourceCommittee],
        people: &[DestinationPerson],
        committees: &[DestinationCommittee],
    ) -> Vec<ReconciliationResult> {
        source
            .iter()
            .map(|c| self.reconcile(c, people, committees))
            .collect()
    }

    /// First same-chamber committee whose name matches case-insensitively.
    fn existing_committee(
        &self,
        name: &str,
        committees: &[DestinationCommittee],
    ) -> Option<String> {
        let wanted = name.to_lowercase();
        committees
            .iter()
            .find(|c| {
                c.chamber_tag == self.config.committee_chamber
                    && c.display_name.to_lowercase() == wanted
            })
            .map(|c| c.id.clone())
    }
}
