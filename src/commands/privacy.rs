use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use newslens::db::{AnalyticsRepository, ExportData, SqliteStore, TrackingRepository};

#[derive(Subcommand)]
pub enum PrivacyCmd {
    /// Show tracking status and retention policy
    Status,
    /// Enable activity tracking
    Enable,
    /// Disable activity tracking
    Disable,
    /// Set the data retention window in days (1-3650)
    Retention { days: i64 },
    /// Delete events older than the retention window
    Cleanup,
    /// Delete all recorded events, preferences, and source classifications
    Reset {
        /// Confirm the irreversible deletion
        #[arg(long)]
        yes: bool,
    },
    /// Dump every table as JSON to stdout
    Export,
    /// Restore a previous export from a JSON file
    Import { file: PathBuf },
}

pub fn run(store: &SqliteStore, cmd: PrivacyCmd) -> Result<()> {
    match cmd {
        PrivacyCmd::Status => {
            let enabled = store.tracking_enabled()?;
            let retention = store.data_retention_days()?;
            println!(
                "tracking: {}",
                if enabled { "enabled" } else { "disabled" }
            );
            println!("retention: {} days", retention);
        }
        PrivacyCmd::Enable => {
            store.set_tracking_enabled(true)?;
            eprintln!("Tracking enabled.");
        }
        PrivacyCmd::Disable => {
            store.set_tracking_enabled(false)?;
            eprintln!("Tracking disabled.");
        }
        PrivacyCmd::Retention { days } => {
            store.set_data_retention_days(days)?;
            eprintln!("Retention set to {} days.", days);
        }
        PrivacyCmd::Cleanup => {
            let deleted = store.cleanup_expired()?;
            println!("Deleted {} expired events.", deleted);
        }
        PrivacyCmd::Reset { yes } => {
            if !yes {
                bail!("reset permanently deletes all analytics data; re-run with --yes to confirm");
            }
            store.reset_all()?;
            eprintln!("All analytics data deleted.");
        }
        PrivacyCmd::Export => {
            let dump = store.export_all()?;
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
        PrivacyCmd::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let dump: ExportData =
                serde_json::from_str(&raw).context("export file is not valid JSON")?;
            store.import_all(&dump)?;
            eprintln!(
                "Imported {} events, {} source classifications, {} preferences, {} settings.",
                dump.consumption_log.len(),
                dump.source_analysis.len(),
                dump.preferences.len(),
                dump.settings.len()
            );
        }
    }
    Ok(())
}
