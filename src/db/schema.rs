pub const SCHEMA_VERSION: u32 = 1;

pub const DDL: &str = "
-- meta
CREATE TABLE IF NOT EXISTS meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- consumption event log (append-only)
CREATE TABLE IF NOT EXISTS consumption_log (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp    TEXT NOT NULL,
    action       TEXT NOT NULL,
    topic        TEXT,
    source       TEXT,
    keywords     TEXT,
    country      TEXT,
    language     TEXT,
    duration     INTEGER NOT NULL DEFAULT 0,
    result_count INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_consumption_ts ON consumption_log(timestamp);
CREATE INDEX IF NOT EXISTS idx_consumption_source ON consumption_log(source);
CREATE INDEX IF NOT EXISTS idx_consumption_topic ON consumption_log(topic);

-- per-source bias/credibility classification cache
CREATE TABLE IF NOT EXISTS source_analysis (
    source            TEXT PRIMARY KEY,
    political_bias    REAL NOT NULL DEFAULT 0.0,
    credibility_score REAL NOT NULL DEFAULT 0.5,
    last_updated      TEXT NOT NULL
);

-- user preference weights
CREATE TABLE IF NOT EXISTS user_preferences (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    preference_type  TEXT NOT NULL,
    preference_value TEXT NOT NULL,
    weight           REAL NOT NULL DEFAULT 1.0,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL,
    UNIQUE(preference_type, preference_value)
);

-- analytics settings (key/value)
CREATE TABLE IF NOT EXISTS analytics_settings (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";
