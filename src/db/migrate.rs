use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema;

/// Compare the stored schema version against this build and migrate if the
/// store is older.
///
/// A database without a meta table (or version row) is treated as fresh and
/// left for the caller to initialize. A store newer than this build is an
/// error; downgrades are not supported.
pub fn check_and_migrate(conn: &Connection) -> Result<MigrateResult> {
    let has_meta: bool = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='meta'",
        [],
        |row| row.get(0),
    )?;

    if !has_meta {
        return Ok(MigrateResult::Fresh);
    }

    let stored: Option<u32> = match conn.query_row(
        "SELECT value FROM meta WHERE key = 'schema_version'",
        [],
        |row| row.get::<_, String>(0),
    ) {
        Ok(v) => v.parse().ok(),
        Err(rusqlite::Error::QueryReturnedNoRows) => None,
        Err(e) => return Err(e.into()),
    };

    let stored = match stored {
        Some(v) => v,
        None => return Ok(MigrateResult::Fresh),
    };

    let current = schema::SCHEMA_VERSION;

    if stored == current {
        return Ok(MigrateResult::UpToDate);
    }

    if stored > current {
        return Err(Error::Corrupt(format!(
            "analytics DB schema version ({}) is newer than this build ({})",
            stored, current
        )));
    }

    run_migrations(conn, stored, current)?;

    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
        [current.to_string()],
    )?;

    Ok(MigrateResult::Migrated {
        from: stored,
        to: current,
    })
}

#[derive(Debug, PartialEq)]
pub enum MigrateResult {
    Fresh,
    UpToDate,
    Migrated { from: u32, to: u32 },
}

/// Run sequential migrations from `from` to `to`.
fn run_migrations(conn: &Connection, from: u32, to: u32) -> Result<()> {
    for version in from..to {
        migrate_step(conn, version, version + 1)?;
    }
    Ok(())
}

/// Execute a single migration step.
///
/// Add new migration steps here as the schema evolves.
fn migrate_step(_conn: &Connection, from: u32, to: u32) -> Result<()> {
    Err(Error::Corrupt(format!(
        "no migration path from v{} to v{}",
        from, to
    )))
}
