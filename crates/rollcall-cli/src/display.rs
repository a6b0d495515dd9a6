//! Run summary card for the console.
//!
//! Renders a [`SyncSummary`] as grouped sections, one line per committee,
//! with unmatched roster names listed under their committee.

use rollcall_sync::{Action, CommitteeOutcome, RosterOrigin, SyncSummary};

const MAX_UNMATCHED: usize = 10;

// ── Public API ──

pub fn print_summary(summary: &SyncSummary) {
    print!("{}", render_summary(summary));
}

pub fn render_summary(summary: &SyncSummary) -> String {
    let mut out = String::new();

    let title = if summary.dry_run {
        "Committee sync (dry run)"
    } else {
        "Committee sync"
    };
    out.push_str(&format!("=== {title} ===\n\n"));

    out.push_str("Run\n");
    field(&mut out, "started", summary.started_at.to_rfc3339());
    let elapsed = summary.finished_at - summary.started_at;
    field(
        &mut out,
        "elapsed",
        format!("{:.1}s", elapsed.num_milliseconds() as f64 / 1000.0),
    );
    let roster = match summary.roster {
        RosterOrigin::Api => "roster API",
        RosterOrigin::Fallback => "built-in fallback",
    };
    field(&mut out, "roster", roster);
    field(&mut out, "people snapshot", summary.people_snapshot);
    field(&mut out, "committee snapshot", summary.committee_snapshot);
    out.push('\n');

    if !summary.committees.is_empty() {
        out.push_str("Committees\n");
        for outcome in &summary.committees {
            committee_line(&mut out, outcome);
        }
        out.push('\n');
    }

    out.push_str("Totals\n");
    field(
        &mut out,
        "successful",
        format!("{}/{}", summary.successful, summary.processed),
    );
    field(&mut out, "member assignments", summary.total_members);
    field(&mut out, "resolved members", summary.resolved_members);
    field(&mut out, "unmatched members", summary.unmatched_members);

    out
}

// ── Line rendering ──

fn field(out: &mut String, label: &str, value: impl std::fmt::Display) {
    out.push_str(&format!("  {label:<26} {value}\n"));
}

fn committee_line(out: &mut String, outcome: &CommitteeOutcome) {
    let (done, verb) = match outcome.action {
        Action::Created => ("created", "create"),
        Action::Updated => ("updated", "update"),
        Action::WouldCreate => ("would create", "create"),
        Action::WouldUpdate => ("would update", "update"),
        Action::Skipped => ("skipped", "write"),
    };
    let status = match &outcome.error {
        None => format!("{done}, {} members", outcome.member_count),
        Some(e) => format!("FAILED to {verb}: {e}"),
    };
    field(out, &outcome.name, status);

    if outcome.unmatched.is_empty() {
        return;
    }
    let shown: Vec<&str> = outcome
        .unmatched
        .iter()
        .take(MAX_UNMATCHED)
        .map(String::as_str)
        .collect();
    let more = outcome.unmatched.len().saturating_sub(MAX_UNMATCHED);
    let mut line = shown.join(", ");
    if more > 0 {
        line.push_str(&format!(" (+{more} more)"));
    }
    out.push_str(&format!("    unmatched: {line}\n"));
}
