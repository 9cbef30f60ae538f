//! evalstat CLI: statistical analysis of scored LLM evaluation datasets.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// evalstat: rigorous statistics for rubric-scored LLM evaluations
#[derive(Parser, Debug)]
#[command(name = "evalstat", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (holds `.evalstat/config.toml`)
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a dataset and run the selected analyses
    Analyze(AnalyzeArgs),
    /// Validate a dataset without analyzing it
    Validate {
        /// Path to the dataset JSON file
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug, Default)]
struct AnalyzeArgs {
    /// Path to the dataset JSON file
    #[arg(short, long)]
    data: PathBuf,

    /// Compute Cohen's kappa per dimension (entries paired by ID)
    #[arg(long)]
    agreement: bool,

    /// Run the t-test and bootstrap test between the two groups
    #[arg(long)]
    significance: bool,

    /// Reference dataset to benchmark against
    #[arg(long, value_name = "PATH")]
    benchmark: Option<PathBuf>,

    /// Baseline dataset for KL drift detection
    #[arg(long, value_name = "PATH")]
    drift: Option<PathBuf>,

    /// Per-partition breakdown: group or model
    #[arg(long, value_name = "KEY")]
    group_by: Option<evalstat_core::analysis::BreakdownKey>,

    /// Write all results as JSON
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Write the per-dimension summary as CSV
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Bootstrap random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Bootstrap iterations
    #[arg(long)]
    iterations: Option<usize>,

    /// Significance level
    #[arg(long)]
    alpha: Option<f64>,

    /// Minimum dataset size
    #[arg(long)]
    min_size: Option<usize>,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create a default configuration file in the workspace
    Init,
    /// Show the effective configuration
    Show,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "evalstat", "evalstat")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "evalstat.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace, cli.quiet)
}
