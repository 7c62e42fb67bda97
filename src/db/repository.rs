use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// --- Event types ---

/// Closed vocabulary of trackable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Search,
    View,
    Summary,
    Sources,
    Config,
    ListTopics,
    Analytics,
    Export,
    Recommend,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Search => "search",
            Action::View => "view",
            Action::Summary => "summary",
            Action::Sources => "sources",
            Action::Config => "config",
            Action::ListTopics => "list-topics",
            Action::Analytics => "analytics",
            Action::Export => "export",
            Action::Recommend => "recommend",
        }
    }
}

impl std::str::FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "search" => Ok(Action::Search),
            "view" => Ok(Action::View),
            "summary" => Ok(Action::Summary),
            "sources" => Ok(Action::Sources),
            "config" => Ok(Action::Config),
            "list-topics" => Ok(Action::ListTopics),
            "analytics" => Ok(Action::Analytics),
            "export" => Ok(Action::Export),
            "recommend" => Ok(Action::Recommend),
            other => Err(Error::validation(
                "action",
                format!(
                    "unknown action '{}': expected one of search, view, summary, sources, \
                     config, list-topics, analytics, export, recommend",
                    other
                ),
            )),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One consumption event to append. Id and timestamp are store-assigned.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub action: Action,
    pub topic: Option<String>,
    pub source: Option<String>,
    pub keywords: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub duration: i64,
    pub result_count: i64,
}

impl NewEvent {
    pub fn new(action: Action) -> Self {
        NewEvent {
            action,
            topic: None,
            source: None,
            keywords: None,
            country: None,
            language: None,
            duration: 0,
            result_count: 0,
        }
    }
}

/// A persisted consumption event, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRow {
    pub id: i64,
    pub timestamp: String,
    pub action: String,
    pub topic: Option<String>,
    pub source: Option<String>,
    pub keywords: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub duration: i64,
    pub result_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceAnalysisRow {
    pub source: String,
    pub political_bias: f64,
    pub credibility_score: f64,
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceRow {
    pub preference_type: String,
    pub preference_value: String,
    pub weight: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

/// Full dump of every logical table, for backup/portability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub consumption_log: Vec<EventRow>,
    pub source_analysis: Vec<SourceAnalysisRow>,
    pub preferences: Vec<PreferenceRow>,
    pub settings: Vec<SettingRow>,
}

// --- Aggregate query types ---

/// Windowed aggregates over the consumption log.
///
/// Count mappings are ordered by count descending (key ascending on ties);
/// `daily_activity` is ascending by calendar date and omits zero-activity
/// days rather than zero-filling the window.
#[derive(Debug, Clone, Serialize)]
pub struct ConsumptionStats {
    pub period_days: i64,
    pub total_activities: i64,
    pub activities_by_action: Vec<(String, i64)>,
    pub activities_by_source: Vec<(String, i64)>,
    pub activities_by_topic: Vec<(String, i64)>,
    pub daily_activity: Vec<(String, i64)>,
    pub start_date: String,
    pub end_date: String,
}

// --- Repository traits ---

/// Write-side contract used by the tracking intake and privacy controls.
pub trait TrackingRepository {
    /// Append one event; returns the assigned row id.
    fn record(&self, event: &NewEvent) -> Result<i64>;

    fn get_setting(&self, key: &str) -> Result<Option<String>>;
    fn set_setting(&self, key: &str, value: &str) -> Result<()>;

    fn tracking_enabled(&self) -> Result<bool>;
    fn set_tracking_enabled(&self, enabled: bool) -> Result<()>;
    fn data_retention_days(&self) -> Result<i64>;
    fn set_data_retention_days(&self, days: i64) -> Result<()>;

    fn set_preference(&self, ptype: &str, value: &str, weight: f64) -> Result<()>;
    fn get_preferences(&self, ptype: Option<&str>) -> Result<Vec<PreferenceRow>>;

    /// Delete events older than the retention setting; returns rows deleted.
    fn cleanup_expired(&self) -> Result<u64>;

    /// Delete all events, preferences, and source classifications.
    /// Settings survive.
    fn reset_all(&self) -> Result<()>;

    /// Re-seed a store from an export dump.
    fn import_all(&self, data: &ExportData) -> Result<()>;
}

/// Read-side contract used by the analyzers and the report assembler.
pub trait AnalyticsRepository {
    fn query_stats(&self, days: i64) -> Result<ConsumptionStats>;

    fn upsert_source_analysis(&self, source: &str, bias: f64, credibility: f64) -> Result<()>;
    fn get_source_analysis(&self, source: &str) -> Result<Option<SourceAnalysisRow>>;
    fn list_source_analysis(&self) -> Result<Vec<SourceAnalysisRow>>;

    fn export_all(&self) -> Result<ExportData>;
}
