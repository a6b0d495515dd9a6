//! One sync run: snapshot, reconcile, and write committee by committee.

use chrono::{DateTime, Utc};
use rollcall_core::{ReconciliationResult, Reconciler, SourceCommittee, WriteAction};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::SyncConfig;
use crate::fallback;
use crate::pacing::PacedQueue;
use crate::store::{CommitteeStore, RosterSource};
use crate::SyncError;

/// What was done (or, in a dry run, would be done) for one committee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Created,
    Updated,
    WouldCreate,
    WouldUpdate,
    /// Not attempted because a destination snapshot could not be read.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitteeOutcome {
    pub name: String,
    pub action: Action,
    /// Resolved members written to the record.
    pub member_count: usize,
    /// Members listed on the roster, matched or not.
    pub roster_members: usize,
    /// Roster names with no destination match.
    pub unmatched: Vec<String>,
    /// Set when the write failed.
    pub error: Option<String>,
}

impl CommitteeOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Where the roster for a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterOrigin {
    Api,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub roster: RosterOrigin,
    pub people_snapshot: usize,
    pub committee_snapshot: usize,
    pub processed: usize,
    pub successful: usize,
    /// Roster member assignments across all committees, matched or not.
    pub total_members: usize,
    /// Member ids actually written across all committees.
    pub resolved_members: usize,
    pub unmatched_members: usize,
    pub committees: Vec<CommitteeOutcome>,
}

impl SyncSummary {
    /// True iff every committee write succeeded.
    pub fn success(&self) -> bool {
        self.successful == self.processed
    }
}

pub struct Orchestrator<R, S> {
    config: SyncConfig,
    roster: R,
    store: S,
    reconciler: Reconciler,
    queue: PacedQueue,
}

impl<R: RosterSource, S: CommitteeStore> Orchestrator<R, S> {
    pub fn new(config: SyncConfig, roster: R, store: S) -> Self {
        let reconciler = Reconciler::new(config.reconcile.clone());
        let queue = PacedQueue::new(config.pace);
        Self {
            config,
            roster,
            store,
            reconciler,
            queue,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run one full sync.
    ///
    /// Fails only on invalid configuration. Write failures are recorded per
    /// committee; an unreadable destination snapshot marks every committee
    /// as failed without writing anything.
    pub async fn run(&self) -> Result<SyncSummary, SyncError> {
        self.config.validate()?;
        let started_at = Utc::now();
        info!(dry_run = self.config.dry_run, "starting committee sync");

        let (roster, people, existing) = tokio::join!(
            self.roster.fetch_committees(),
            self.store.list_people(),
            self.store.list_committees(),
        );
        let (committees, origin) = roster_or_fallback(roster);
        let snapshots = people.and_then(|people| existing.map(|existing| (people, existing)));
        let (people, existing) = match snapshots {
            Ok(snapshots) => snapshots,
            Err(e) => {
                error!(error = %e, "destination snapshot unavailable, skipping all writes");
                let reason = format!("destination snapshot unavailable: {e}");
                let outcomes = committees
                    .iter()
                    .map(|committee| CommitteeOutcome {
                        name: committee.name.clone(),
                        action: Action::Skipped,
                        member_count: 0,
                        roster_members: committee.members.len(),
                        unmatched: Vec::new(),
                        error: Some(reason.clone()),
                    })
                    .collect();
                return Ok(self.summarize(started_at, origin, (0, 0), outcomes));
            }
        };
        info!(
            committees = committees.len(),
            people = people.len(),
            existing = existing.len(),
            "fetched snapshots"
        );

        let results = self
            .reconciler
            .reconcile_all(&committees, &people, &existing);
        for result in &results {
            for name in &result.unmatched_members {
                warn!(
                    committee = %result.payload.name,
                    member = %name,
                    "no destination match for member"
                );
            }
        }

        let outcomes = self.queue.run(results, |result| self.write(result)).await;
        Ok(self.summarize(started_at, origin, (people.len(), existing.len()), outcomes))
    }

    fn summarize(
        &self,
        started_at: DateTime<Utc>,
        roster: RosterOrigin,
        (people_snapshot, committee_snapshot): (usize, usize),
        committees: Vec<CommitteeOutcome>,
    ) -> SyncSummary {
        let processed = committees.len();
        let successful = committees.iter().filter(|o| o.succeeded()).count();
        let total_members = committees.iter().map(|o| o.roster_members).sum();
        let resolved_members = committees.iter().map(|o| o.member_count).sum();
        let unmatched_members = committees.iter().map(|o| o.unmatched.len()).sum();
        info!(processed, successful, total_members, "sync finished");

        SyncSummary {
            started_at,
            finished_at: Utc::now(),
            dry_run: self.config.dry_run,
            roster,
            people_snapshot,
            committee_snapshot,
            processed,
            successful,
            total_members,
            resolved_members,
            unmatched_members,
            committees,
        }
    }

    async fn write(&self, result: ReconciliationResult) -> CommitteeOutcome {
        let fields = &result.payload;
        let (action, written) = match (result.action(), self.config.dry_run) {
            (WriteAction::Create, true) => (Action::WouldCreate, Ok(())),
            (WriteAction::Update(_), true) => (Action::WouldUpdate, Ok(())),
            (WriteAction::Create, false) => {
                (Action::Created, self.store.create_committee(fields).await)
            }
            (WriteAction::Update(id), false) => {
                (Action::Updated, self.store.update_committee(id, fields).await)
            }
        };

        let error = match written {
            Ok(()) => {
                info!(
                    committee = %fields.name,
                    ?action,
                    members = fields.member_count,
                    "committee written"
                );
                None
            }
            Err(e) => {
                error!(committee = %fields.name, ?action, error = %e, "committee write failed");
                Some(e.to_string())
            }
        };

        CommitteeOutcome {
            name: fields.name.clone(),
            action,
            member_count: fields.member_count,
            roster_members: fields.member_count + result.unmatched_members.len(),
            unmatched: result.unmatched_members.clone(),
            error,
        }
    }
}

fn roster_or_fallback(
    fetched: Result<Vec<SourceCommittee>, SyncError>,
) -> (Vec<SourceCommittee>, RosterOrigin) {
    match fetched {
        Ok(committees) if !committees.is_empty() => (committees, RosterOrigin::Api),
        Ok(_) => {
            warn!("roster API returned no committees, using fallback roster");
            (fallback::committees(), RosterOrigin::Fallback)
        }
        Err(e) => {
            warn!(error = %e, "roster unavailable, using fallback roster");
            (fallback::committees(), RosterOrigin::Fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use rollcall_core::reconcile::{SENATE_COMMITTEE_CHAMBER, SENATE_PERSON_CHAMBER};
    use rollcall_core::{CommitteeFields, DestinationCommittee, DestinationPerson, PersonRef};

    use super::*;

    struct FixedRoster(Result<Vec<SourceCommittee>, ()>);

    #[async_trait]
    impl RosterSource for FixedRoster {
        async fn fetch_committees(&self) -> Result<Vec<SourceCommittee>, SyncError> {
            self.0
                .clone()
                .map_err(|_| SyncError::Server {
                    status: 503,
                    body: "roster down".into(),
                })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Write {
        Create(CommitteeFields),
        Update(String, CommitteeFields),
    }

    #[derive(Default)]
    struct MemoryStore {
        people: Vec<DestinationPerson>,
        committees: Vec<DestinationCommittee>,
        fail_people: bool,
        fail_committees: bool,
        fail_writes_for: Vec<String>,
        writes: Mutex<Vec<Write>>,
    }

    impl MemoryStore {
        fn writes(&self) -> Vec<Write> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommitteeStore for MemoryStore {
        async fn list_people(&self) -> Result<Vec<DestinationPerson>, SyncError> {
            if self.fail_people {
                return Err(SyncError::Server {
                    status: 503,
                    body: "unavailable".into(),
                });
            }
            Ok(self.people.clone())
        }

        async fn list_committees(&self) -> Result<Vec<DestinationCommittee>, SyncError> {
            if self.fail_committees {
                return Err(SyncError::Server {
                    status: 500,
                    body: "boom".into(),
                });
            }
            Ok(self.committees.clone())
        }

        async fn create_committee(&self, fields: &CommitteeFields) -> Result<(), SyncError> {
            if self.fail_writes_for.contains(&fields.name) {
                return Err(SyncError::Server {
                    status: 429,
                    body: "rate limited".into(),
                });
            }
            self.writes.lock().unwrap().push(Write::Create(fields.clone()));
            Ok(())
        }

        async fn update_committee(
            &self,
            id: &str,
            fields: &CommitteeFields,
        ) -> Result<(), SyncError> {
            if self.fail_writes_for.contains(&fields.name) {
                return Err(SyncError::Server {
                    status: 429,
                    body: "rate limited".into(),
                });
            }
            self.writes
                .lock()
                .unwrap()
                .push(Write::Update(id.to_string(), fields.clone()));
            Ok(())
        }
    }

    fn config() -> SyncConfig {
        let mut config = SyncConfig::default();
        config.destination.token = Some("tok".into());
        config.pace = Duration::ZERO;
        config
    }

    fn senator(id: &str, name: &str) -> DestinationPerson {
        DestinationPerson {
            id: id.into(),
            display_name: name.into(),
            chamber_tag: SENATE_PERSON_CHAMBER.into(),
        }
    }

    fn roster() -> Vec<SourceCommittee> {
        vec![
            SourceCommittee {
                name: "Health".into(),
                chair: Some(PersonRef::new("Gustavo Rivera")),
                members: vec![PersonRef::new("Gustavo Rivera"), PersonRef::new("Rachel May")],
            },
            SourceCommittee {
                name: "Aging".into(),
                chair: None,
                members: vec![PersonRef::new("Nobody Known")],
            },
        ]
    }

    fn store() -> MemoryStore {
        MemoryStore {
            people: vec![
                senator("p-rivera", "Gustavo Rivera"),
                senator("p-may", "Rachel May"),
            ],
            committees: vec![DestinationCommittee {
                id: "c-health".into(),
                display_name: "health".into(),
                chamber_tag: SENATE_COMMITTEE_CHAMBER.into(),
            }],
            ..MemoryStore::default()
        }
    }

    #[tokio::test]
    async fn creates_and_updates_in_roster_order() {
        let orch = Orchestrator::new(config(), FixedRoster(Ok(roster())), store());
        let summary = orch.run().await.unwrap();

        assert!(summary.success());
        assert_eq!(summary.roster, RosterOrigin::Api);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.total_members, 3);
        assert_eq!(summary.resolved_members, 2);
        assert_eq!(summary.unmatched_members, 1);
        assert_eq!(summary.committees[0].action, Action::Updated);
        assert_eq!(summary.committees[1].action, Action::Created);
        assert_eq!(summary.committees[1].unmatched, vec!["Nobody Known"]);

        let writes = orch.store.writes();
        assert_eq!(writes.len(), 2);
        match &writes[0] {
            Write::Update(id, fields) => {
                assert_eq!(id, "c-health");
                assert_eq!(fields.committee_members, vec!["p-rivera", "p-may"]);
            }
            other => panic!("expected update, got {other:?}"),
        }
        assert!(matches!(
            &writes[1],
            Write::Create(f) if f.name == "Aging" && f.member_count == 0
        ));
    }

    #[tokio::test]
    async fn repeated_runs_write_identical_payloads() {
        let orch = Orchestrator::new(config(), FixedRoster(Ok(roster())), store());
        orch.run().await.unwrap();
        orch.run().await.unwrap();
        let writes = orch.store.writes();
        assert_eq!(writes.len(), 4);
        assert_eq!(writes[0], writes[2]);
        assert_eq!(writes[1], writes[3]);
    }

    #[tokio::test]
    async fn write_failure_does_not_stop_the_run() {
        let store = MemoryStore {
            fail_writes_for: vec!["Health".into()],
            ..store()
        };
        let orch = Orchestrator::new(config(), FixedRoster(Ok(roster())), store);
        let summary = orch.run().await.unwrap();

        assert!(!summary.success());
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.successful, 1);
        let health = &summary.committees[0];
        assert!(!health.succeeded());
        assert!(health.error.as_deref().unwrap().contains("429"));
        assert_eq!(orch.store.writes().len(), 1);
    }

    #[tokio::test]
    async fn roster_failure_uses_fallback() {
        let orch = Orchestrator::new(config(), FixedRoster(Err(())), store());
        let summary = orch.run().await.unwrap();
        assert_eq!(summary.roster, RosterOrigin::Fallback);
        let names: Vec<&str> = summary.committees.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Agriculture", "Health", "Finance"]);
    }

    #[tokio::test]
    async fn empty_roster_uses_fallback() {
        let orch = Orchestrator::new(config(), FixedRoster(Ok(vec![])), store());
        let summary = orch.run().await.unwrap();
        assert_eq!(summary.roster, RosterOrigin::Fallback);
        assert_eq!(summary.processed, 3);
    }

    #[tokio::test]
    async fn total_members_counts_unmatched_roster_entries() {
        let roster = vec![SourceCommittee {
            name: "Health".into(),
            chair: None,
            members: vec![PersonRef::new("Rachel May"), PersonRef::new("Nobody Known")],
        }];
        let orch = Orchestrator::new(config(), FixedRoster(Ok(roster)), store());
        let summary = orch.run().await.unwrap();
        assert_eq!(summary.total_members, 2);
        assert_eq!(summary.resolved_members, 1);
        assert_eq!(summary.committees[0].roster_members, 2);
        assert_eq!(summary.committees[0].member_count, 1);
    }

    #[tokio::test]
    async fn people_snapshot_failure_fails_every_committee_without_writes() {
        let store = MemoryStore {
            fail_people: true,
            ..store()
        };
        let orch = Orchestrator::new(config(), FixedRoster(Ok(roster())), store);
        let summary = orch.run().await.unwrap();

        assert!(!summary.success());
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.people_snapshot, 0);
        assert_eq!(summary.total_members, 3);
        assert_eq!(summary.resolved_members, 0);
        for outcome in &summary.committees {
            assert_eq!(outcome.action, Action::Skipped);
            assert!(outcome.error.as_deref().unwrap().contains("503"));
        }
        assert!(orch.store.writes().is_empty());
    }

    #[tokio::test]
    async fn committee_snapshot_failure_fails_every_committee_without_writes() {
        let store = MemoryStore {
            fail_committees: true,
            ..store()
        };
        let orch = Orchestrator::new(config(), FixedRoster(Ok(roster())), store);
        let summary = orch.run().await.unwrap();

        assert!(!summary.success());
        assert_eq!(summary.successful, 0);
        assert!(
            summary
                .committees
                .iter()
                .all(|o| o.error.as_deref().is_some_and(|e| e.contains("500")))
        );
        assert!(orch.store.writes().is_empty());
    }

    #[tokio::test]
    async fn missing_token_aborts_before_any_call() {
        let mut config = config();
        config.destination.token = None;
        let store = MemoryStore {
            fail_people: true,
            ..store()
        };
        let orch = Orchestrator::new(config, FixedRoster(Ok(roster())), store);
        let err = orch.run().await.unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let mut config = config();
        config.dry_run = true;
        let orch = Orchestrator::new(config, FixedRoster(Ok(roster())), store());
        let summary = orch.run().await.unwrap();
        assert!(summary.success());
        assert!(summary.dry_run);
        assert_eq!(summary.committees[0].action, Action::WouldUpdate);
        assert_eq!(summary.committees[1].action, Action::WouldCreate);
        assert!(orch.store.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn writes_are_paced() {
        let mut config = config();
        config.pace = Duration::from_millis(200);
        let orch = Orchestrator::new(config, FixedRoster(Err(())), store());
        let start = tokio::time::Instant::now();
        orch.run().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(400), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(410), "{elapsed:?}");
    }

    #[test]
    fn summary_serialises_for_reporting() {
        let summary = SyncSummary {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            dry_run: false,
            roster: RosterOrigin::Fallback,
            people_snapshot: 2,
            committee_snapshot: 1,
            processed: 1,
            successful: 1,
            total_members: 2,
            resolved_members: 2,
            unmatched_members: 0,
            committees: vec![CommitteeOutcome {
                name: "Health".into(),
                action: Action::WouldCreate,
                member_count: 2,
                roster_members: 2,
                unmatched: vec![],
                error: None,
            }],
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["roster"], "fallback");
        assert_eq!(value["committees"][0]["action"], "would_create");
        assert!(value["committees"][0]["error"].is_null());
    }
}
