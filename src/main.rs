use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{privacy, recommend, report, track};

#[derive(Parser)]
#[command(name = "newslens")]
#[command(version)]
#[command(about = "Track news consumption and analyze source diversity, bias exposure, and reading habits")]
struct Cli {
    /// Path to the analytics database (default: ~/.newslens/analytics.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record one user action into the consumption log
    Track(track::TrackArgs),
    /// Windowed aggregates over the consumption log
    Stats(report::ReportArgs),
    /// Full consumption report: trends, blind spots, insights, health score
    Report(report::ReportArgs),
    /// Source, topic, and habit recommendations
    Recommend(recommend::RecommendArgs),
    /// Tracking, retention, and data-removal controls
    Privacy {
        #[command(subcommand)]
        command: privacy::PrivacyCmd,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = commands::open_store(cli.db.as_deref())?;

    match cli.command {
        Command::Track(args) => track::run(&store, args),
        Command::Stats(args) => report::run_stats(&store, args),
        Command::Report(args) => report::run_report(&store, args),
        Command::Recommend(args) => recommend::run(&store, args),
        Command::Privacy { command } => privacy::run(&store, command),
    }
}
