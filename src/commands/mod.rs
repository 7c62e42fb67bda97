pub mod privacy;
pub mod recommend;
pub mod report;
pub mod track;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use newslens::db::SqliteStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("invalid format '{}': expected text or json", s)),
        }
    }
}

pub fn parse_format(s: &str) -> Result<OutputFormat> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

/// Open the analytics store, defaulting to `~/.newslens/analytics.db`.
pub fn open_store(db: Option<&Path>) -> Result<SqliteStore> {
    let path = match db {
        Some(p) => p.to_path_buf(),
        None => default_db_path()?,
    };
    SqliteStore::open(&path)
        .with_context(|| format!("failed to open analytics DB: {}", path.display()))
}

fn default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set")?;
    Ok(PathBuf::from(home).join(".newslens").join("analytics.db"))
}
