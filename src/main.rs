use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use queue_congestion::classify::Pipeline;
use queue_congestion::config::{Config, LogFormat, LoggingConfig};
use queue_congestion::snapshot::{JsonSnapshot, SnapshotPath};
use queue_congestion::{queues, report, slots};

#[derive(Parser)]
#[command(
    name = "queue-congestion",
    about = "Decide which HTCondor queues are full from a job snapshot",
    version,
    long_about = None
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Snapshot of job ads (`condor_q -json` output or JSON Lines); `-` reads stdin
    #[arg(long, default_value = "-")]
    snapshot: String,

    /// Attribute to index jobs by [MATCH_APF_QUEUE]
    #[arg(short = 'k', long)]
    key: Option<String>,

    /// Print the header of each column
    #[arg(short = 'H', long)]
    headers: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every queue as full or not full
    IsFull {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Count jobs per queue in each state
    QueueStatus {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// List the jobs in the snapshot
    Jobs {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// List the startd slots in a snapshot of slot ads
    Slots {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn snapshot_args(&self) -> &SnapshotArgs {
        match self {
            Commands::IsFull { snapshot, .. }
            | Commands::QueueStatus { snapshot, .. }
            | Commands::Jobs { snapshot, .. }
            | Commands::Slots { snapshot, .. } => snapshot,
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = cli.command.snapshot_args();
    let config = Config::resolve(cli.config.as_deref())?.with_queue_key(args.key.clone());
    init_tracing(&config.logging);

    let source = JsonSnapshot::new(SnapshotPath::from_arg(&args.snapshot));
    let pipeline = Pipeline::new(config.attributes.clone(), config.classifier);

    match &cli.command {
        Commands::IsFull { snapshot, json } => {
            let classification = queue_congestion::assess(&source, &pipeline);
            if !classification.diagnostics.dropped_records.is_empty() {
                tracing::warn!(
                    dropped = classification.diagnostics.dropped_records.len(),
                    "some job records were excluded"
                );
            }
            if *json {
                println!("{}", serde_json::to_string_pretty(&classification.targets)?);
            } else {
                print!("{}", report::targets::table(&classification.targets, snapshot.headers));
            }
        }
        Commands::QueueStatus { snapshot, json } => {
            let data = queue_congestion::fetch_or_empty(&source);
            let summary = queues::summarize(&data, pipeline.normalizer());
            if *json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::queues::table(&summary, snapshot.headers));
            }
        }
        Commands::Jobs { snapshot, json } => {
            let data = queue_congestion::fetch_or_empty(&source);
            let rows = report::jobs::rows(&data, pipeline.normalizer());
            if *json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", report::jobs::table(&rows, snapshot.headers));
            }
        }
        Commands::Slots { snapshot, json } => {
            let data = queue_congestion::fetch_or_empty(&source);
            let listing = slots::slots(&data);
            if *json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                print!("{}", report::slots::table(&listing, snapshot.headers));
            }
        }
    }

    Ok(())
}
