pub mod committee;
pub mod matcher;
pub mod reconcile;
pub mod slug;

pub use committee::{
    CommitteeFields, DestinationCommittee, DestinationPerson, PersonRef, ReconciliationResult,
    SourceCommittee, WriteAction,
};
pub use matcher::{MatchTier, NameMatcher, PersonMatch};
pub use reconcile::{ReconcileConfig, Reconciler};
pub use slug::{CommitteeSlug, FieldTemplate, slugify};
