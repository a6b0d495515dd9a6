//! Sync layer: roster and destination-store clients, paced writes, and the
//! run orchestrator around the pure reconciliation core.

pub mod config;
mod error;
pub mod fallback;
pub mod orchestrator;
pub mod pacing;
pub mod store;

#[cfg(feature = "http")]
pub mod roster;
#[cfg(feature = "http")]
pub mod webflow;

pub use config::{DestinationConfig, RosterConfig, SyncConfig};
pub use error::{ConfigError, SyncError};
pub use orchestrator::{Action, CommitteeOutcome, Orchestrator, RosterOrigin, SyncSummary};
pub use pacing::PacedQueue;
pub use store::{CommitteeStore, RosterSource};

#[cfg(feature = "http")]
pub use roster::RosterClient;
#[cfg(feature = "http")]
pub use webflow::WebflowClient;
