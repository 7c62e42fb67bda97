use std::path::Path;

use chrono::{Duration, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::{Error, Result};

use super::migrate::{self, MigrateResult};
use super::repository::*;
use super::schema;

const DEFAULT_RETENTION_DAYS: i64 = 365;
const RETENTION_RANGE: std::ops::RangeInclusive<i64> = 1..=3650;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the analytics database at `db_path` and bring the
    /// schema up to date.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        Self::prepare(conn)
    }

    /// In-memory store, used by tests and throwaway analysis.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        if let MigrateResult::Migrated { from, to } = migrate::check_and_migrate(&conn)? {
            debug!(from, to, "analytics schema migrated");
        }

        conn.execute_batch(schema::DDL)?;
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', ?1)",
            params![schema::SCHEMA_VERSION.to_string()],
        )?;

        Ok(Self { conn })
    }

    fn grouped_counts(&self, sql: &str, since: &str) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([since], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl TrackingRepository for SqliteStore {
    fn record(&self, event: &NewEvent) -> Result<i64> {
        if event.duration < 0 {
            return Err(Error::validation("duration", "must be non-negative"));
        }
        if event.result_count < 0 {
            return Err(Error::validation("result_count", "must be non-negative"));
        }

        self.conn.execute(
            "INSERT INTO consumption_log
             (timestamp, action, topic, source, keywords, country, language, duration, result_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                now_rfc3339(),
                event.action.as_str(),
                event.topic,
                event.source,
                event.keywords,
                event.country,
                event.language,
                event.duration,
                event.result_count,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        match self.conn.query_row(
            "SELECT value FROM analytics_settings WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        ) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO analytics_settings (key, value, updated_at)
             VALUES (?1, ?2, ?3)",
            params![key, value, now_rfc3339()],
        )?;
        Ok(())
    }

    fn tracking_enabled(&self) -> Result<bool> {
        Ok(self
            .get_setting("tracking_enabled")?
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true))
    }

    fn set_tracking_enabled(&self, enabled: bool) -> Result<()> {
        self.set_setting("tracking_enabled", if enabled { "true" } else { "false" })
    }

    fn data_retention_days(&self) -> Result<i64> {
        match self.get_setting("data_retention_days")? {
            None => Ok(DEFAULT_RETENTION_DAYS),
            Some(v) => v.parse().map_err(|_| {
                Error::Corrupt(format!("data_retention_days is not an integer: {:?}", v))
            }),
        }
    }

    fn set_data_retention_days(&self, days: i64) -> Result<()> {
        if !RETENTION_RANGE.contains(&days) {
            return Err(Error::validation(
                "data_retention_days",
                format!(
                    "{} is outside the allowed range {}..={}",
                    days,
                    RETENTION_RANGE.start(),
                    RETENTION_RANGE.end()
                ),
            ));
        }
        self.set_setting("data_retention_days", &days.to_string())
    }

    fn set_preference(&self, ptype: &str, value: &str, weight: f64) -> Result<()> {
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO user_preferences
             (preference_type, preference_value, weight, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(preference_type, preference_value)
             DO UPDATE SET weight = excluded.weight, updated_at = excluded.updated_at",
            params![ptype, value, weight, now],
        )?;
        Ok(())
    }

    fn get_preferences(&self, ptype: Option<&str>) -> Result<Vec<PreferenceRow>> {
        let map = |row: &rusqlite::Row<'_>| {
            Ok(PreferenceRow {
                preference_type: row.get(0)?,
                preference_value: row.get(1)?,
                weight: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        };

        let mut out = Vec::new();
        match ptype {
            Some(t) => {
                let mut stmt = self.conn.prepare(
                    "SELECT preference_type, preference_value, weight, created_at, updated_at
                     FROM user_preferences
                     WHERE preference_type = ?1
                     ORDER BY weight DESC, updated_at DESC",
                )?;
                let rows = stmt.query_map([t], map)?;
                for row in rows {
                    out.push(row?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT preference_type, preference_value, weight, created_at, updated_at
                     FROM user_preferences
                     ORDER BY preference_type, weight DESC, updated_at DESC",
                )?;
                let rows = stmt.query_map([], map)?;
                for row in rows {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }

    fn cleanup_expired(&self) -> Result<u64> {
        let retention_days = self.data_retention_days()?;
        let cutoff =
            (Utc::now() - Duration::days(retention_days)).to_rfc3339_opts(SecondsFormat::Secs, true);
        let deleted = self.conn.execute(
            "DELETE FROM consumption_log WHERE timestamp < ?1",
            [cutoff],
        )?;
        debug!(deleted, retention_days, "retention cleanup");
        Ok(deleted as u64)
    }

    fn reset_all(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM consumption_log", [])?;
        tx.execute("DELETE FROM user_preferences", [])?;
        tx.execute("DELETE FROM source_analysis", [])?;
        tx.commit()?;
        Ok(())
    }

    fn import_all(&self, data: &ExportData) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for event in &data.consumption_log {
            tx.execute(
                "INSERT INTO consumption_log
                 (timestamp, action, topic, source, keywords, country, language, duration, result_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    event.timestamp,
                    event.action,
                    event.topic,
                    event.source,
                    event.keywords,
                    event.country,
                    event.language,
                    event.duration,
                    event.result_count,
                ],
            )?;
        }
        for source in &data.source_analysis {
            tx.execute(
                "INSERT OR REPLACE INTO source_analysis
                 (source, political_bias, credibility_score, last_updated)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    source.source,
                    source.political_bias,
                    source.credibility_score,
                    source.last_updated,
                ],
            )?;
        }
        for pref in &data.preferences {
            tx.execute(
                "INSERT OR REPLACE INTO user_preferences
                 (preference_type, preference_value, weight, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    pref.preference_type,
                    pref.preference_value,
                    pref.weight,
                    pref.created_at,
                    pref.updated_at,
                ],
            )?;
        }
        for setting in &data.settings {
            tx.execute(
                "INSERT OR REPLACE INTO analytics_settings (key, value, updated_at)
                 VALUES (?1, ?2, ?3)",
                params![setting.key, setting.value, setting.updated_at],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl AnalyticsRepository for SqliteStore {
    fn query_stats(&self, days: i64) -> Result<ConsumptionStats> {
        if days < 1 {
            return Err(Error::validation("days", "period must be at least 1 day"));
        }

        let end = Utc::now();
        let start = end - Duration::days(days);
        let start_s = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end_s = end.to_rfc3339_opts(SecondsFormat::Secs, true);

        let total_activities: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM consumption_log WHERE timestamp >= ?1",
            [&start_s],
            |row| row.get(0),
        )?;

        let activities_by_action = self.grouped_counts(
            "SELECT action, COUNT(*) AS count FROM consumption_log
             WHERE timestamp >= ?1
             GROUP BY action
             ORDER BY count DESC, action ASC",
            &start_s,
        )?;

        let activities_by_source = self.grouped_counts(
            "SELECT source, COUNT(*) AS count FROM consumption_log
             WHERE timestamp >= ?1 AND source IS NOT NULL
             GROUP BY source
             ORDER BY count DESC, source ASC",
            &start_s,
        )?;

        let activities_by_topic = self.grouped_counts(
            "SELECT topic, COUNT(*) AS count FROM consumption_log
             WHERE timestamp >= ?1 AND topic IS NOT NULL
             GROUP BY topic
             ORDER BY count DESC, topic ASC",
            &start_s,
        )?;

        let daily_activity = self.grouped_counts(
            "SELECT SUBSTR(timestamp, 1, 10) AS date, COUNT(*) AS count
             FROM consumption_log
             WHERE timestamp >= ?1
             GROUP BY date
             ORDER BY date ASC",
            &start_s,
        )?;

        Ok(ConsumptionStats {
            period_days: days,
            total_activities,
            activities_by_action,
            activities_by_source,
            activities_by_topic,
            daily_activity,
            start_date: start_s,
            end_date: end_s,
        })
    }

    fn upsert_source_analysis(&self, source: &str, bias: f64, credibility: f64) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO source_analysis
             (source, political_bias, credibility_score, last_updated)
             VALUES (?1, ?2, ?3, ?4)",
            params![source, bias, credibility, now_rfc3339()],
        )?;
        Ok(())
    }

    fn get_source_analysis(&self, source: &str) -> Result<Option<SourceAnalysisRow>> {
        match self.conn.query_row(
            "SELECT source, political_bias, credibility_score, last_updated
             FROM source_analysis WHERE source = ?1",
            [source],
            |row| {
                Ok(SourceAnalysisRow {
                    source: row.get(0)?,
                    political_bias: row.get(1)?,
                    credibility_score: row.get(2)?,
                    last_updated: row.get(3)?,
                })
            },
        ) {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_source_analysis(&self) -> Result<Vec<SourceAnalysisRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT source, political_bias, credibility_score, last_updated
             FROM source_analysis ORDER BY source ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SourceAnalysisRow {
                source: row.get(0)?,
                political_bias: row.get(1)?,
                credibility_score: row.get(2)?,
                last_updated: row.get(3)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn export_all(&self) -> Result<ExportData> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, action, topic, source, keywords, country, language,
                    duration, result_count
             FROM consumption_log ORDER BY timestamp, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                action: row.get(2)?,
                topic: row.get(3)?,
                source: row.get(4)?,
                keywords: row.get(5)?,
                country: row.get(6)?,
                language: row.get(7)?,
                duration: row.get(8)?,
                result_count: row.get(9)?,
            })
        })?;
        let mut consumption_log = Vec::new();
        for row in rows {
            consumption_log.push(row?);
        }

        let source_analysis = self.list_source_analysis()?;
        let preferences = self.get_preferences(None)?;

        let mut stmt = self.conn.prepare(
            "SELECT key, value, updated_at FROM analytics_settings ORDER BY key",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SettingRow {
                key: row.get(0)?,
                value: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })?;
        let mut settings = Vec::new();
        for row in rows {
            settings.push(row?);
        }

        Ok(ExportData {
            consumption_log,
            source_analysis,
            preferences,
            settings,
        })
    }
}
