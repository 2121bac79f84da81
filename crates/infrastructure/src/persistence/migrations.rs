//! Database migrations
//!
//! The schema version lives in `schema_version`; each `migrate_vN` is
//! applied once, in order.

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version >= SCHEMA_VERSION {
        debug!(version = current_version, "Database schema is up to date");
        return Ok(());
    }

    info!(
        from_version = current_version,
        to_version = SCHEMA_VERSION,
        "Running database migrations"
    );

    if current_version < 1 {
        if let Err(e) = migrate_v1(conn) {
            error!(version = 1, error = %e, "Migration V001 (locations) failed");
            return Err(e);
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!(version = SCHEMA_VERSION, "Database migrations complete");
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Version 1: points of interest
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: locations");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL
                CHECK(category IN ('Architecture', 'Films', 'History', 'Music', 'Location')),
            name TEXT NOT NULL CHECK(length(name) BETWEEN 1 AND 255),
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            fact TEXT NOT NULL DEFAULT '',
            category_tag TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_locations_category ON locations(category);
        CREATE INDEX IF NOT EXISTS idx_locations_position ON locations(latitude, longitude);
        ",
    )
    .map_err(|e| DatabaseError::Migration(format!("V001: {e}")))
}
