mod display;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rollcall_core::ReconcileConfig;
use rollcall_core::reconcile::{SENATE_COMMITTEE_CHAMBER, SENATE_PERSON_CHAMBER};
use rollcall_sync::config::{
    DEFAULT_COMMITTEES_COLLECTION, DEFAULT_DESTINATION_API_BASE, DEFAULT_PAGE_SIZE,
    DEFAULT_PACE, DEFAULT_PEOPLE_COLLECTION, DEFAULT_ROSTER_API_BASE, DEFAULT_SESSION,
};
use rollcall_sync::{
    DestinationConfig, Orchestrator, RosterClient, RosterConfig, SyncConfig, WebflowClient,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rollcall",
    version,
    about = "Keep CMS committee records in step with the Senate roster"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the roster, reconcile it against the CMS, and write every committee.
    Sync(SyncArgs),
}

#[derive(Args)]
struct SyncArgs {
    /// Destination CMS API token.
    #[arg(long, env = "WEBFLOW_API_TOKEN", hide_env_values = true)]
    webflow_token: Option<String>,

    /// Roster API key; without it the built-in fallback roster is used.
    #[arg(long, env = "NY_SENATE_API_KEY", hide_env_values = true)]
    senate_api_key: Option<String>,

    #[arg(long, env = "ROLLCALL_WEBFLOW_API_BASE", default_value = DEFAULT_DESTINATION_API_BASE)]
    webflow_api_base: String,

    #[arg(long, env = "ROLLCALL_SENATE_API_BASE", default_value = DEFAULT_ROSTER_API_BASE)]
    senate_api_base: String,

    /// People collection used for member matching.
    #[arg(long, env = "ROLLCALL_PEOPLE_COLLECTION", default_value = DEFAULT_PEOPLE_COLLECTION)]
    people_collection: String,

    /// Committee collection that is read and written.
    #[arg(
        long,
        env = "ROLLCALL_COMMITTEES_COLLECTION",
        default_value = DEFAULT_COMMITTEES_COLLECTION
    )]
    committees_collection: String,

    /// Chamber option id of Senate people.
    #[arg(long, default_value = SENATE_PERSON_CHAMBER)]
    person_chamber: String,

    /// Chamber option id of Senate committees.
    #[arg(long, default_value = SENATE_COMMITTEE_CHAMBER)]
    committee_chamber: String,

    /// Legislative session year.
    #[arg(long, default_value_t = DEFAULT_SESSION)]
    session: u16,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Milliseconds to wait between committee writes.
    #[arg(long, default_value_t = DEFAULT_PACE.as_millis() as u64)]
    pace_ms: u64,

    /// Reconcile and report without writing.
    #[arg(long)]
    dry_run: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

impl SyncArgs {
    fn to_config(&self) -> SyncConfig {
        SyncConfig {
            destination: DestinationConfig {
                api_base: self.webflow_api_base.clone(),
                token: self.webflow_token.clone(),
                people_collection: self.people_collection.clone(),
                committees_collection: self.committees_collection.clone(),
                page_size: self.page_size,
                ..DestinationConfig::default()
            },
            roster: RosterConfig {
                api_base: self.senate_api_base.clone(),
                api_key: self.senate_api_key.clone(),
                session: self.session,
            },
            pace: Duration::from_millis(self.pace_ms),
            dry_run: self.dry_run,
            reconcile: ReconcileConfig {
                person_chamber: self.person_chamber.clone(),
                committee_chamber: self.committee_chamber.clone(),
                ..ReconcileConfig::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("rollcall v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Sync(args) => sync(&args).await,
    }
}

async fn sync(args: &SyncArgs) -> anyhow::Result<ExitCode> {
    let config = args.to_config();
    config.validate().context("invalid configuration")?;
    if config.roster.api_key.is_none() {
        warn!("NY_SENATE_API_KEY not set, the fallback roster will be used");
    }

    let roster = RosterClient::new(&config.roster);
    let store = WebflowClient::new(&config.destination).context("building CMS client")?;
    let summary = Orchestrator::new(config, roster, store)
        .run()
        .await
        .context("committee sync failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        display::print_summary(&summary);
    }

    if summary.success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
