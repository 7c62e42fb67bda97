pub mod migrate;
pub mod repository;
pub mod schema;
pub mod sqlite;

pub use repository::{
    Action, AnalyticsRepository, ConsumptionStats, EventRow, ExportData, NewEvent, PreferenceRow,
    SettingRow, SourceAnalysisRow, TrackingRepository,
};
pub use sqlite::SqliteStore;
