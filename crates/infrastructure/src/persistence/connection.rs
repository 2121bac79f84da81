//! SQLite connection pool
//!
//! One r2d2 pool per process; every pooled connection gets the same pragmas.

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Path value that selects an in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// Database errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// No connection could be checked out of the pool
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A statement failed
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The schema could not be brought up to date
    #[error("Migration error: {0}")]
    Migration(String),

    /// Unusable pool settings or database path
    #[error("Invalid database configuration: {0}")]
    Configuration(String),
}

/// SQLite connection pool type alias
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Create a connection pool and bring the schema up to date
///
/// An in-memory database lives per connection, so `:memory:` is capped to
/// a single pooled connection.
pub fn create_pool(config: &DatabaseConfig) -> Result<ConnectionPool, DatabaseError> {
    if config.max_connections == 0 {
        return Err(DatabaseError::Configuration(
            "max_connections must be greater than 0".to_string(),
        ));
    }

    let in_memory = config.path == MEMORY_PATH;
    let max_size = if in_memory { 1 } else { config.max_connections };
    info!(path = %config.path, max_connections = max_size, "Creating location database pool");

    let manager = if in_memory {
        SqliteConnectionManager::memory()
    } else {
        ensure_parent_dir(&config.path)?;
        SqliteConnectionManager::file(&config.path)
    }
    .with_init(apply_pragmas);

    let pool = Pool::builder().max_size(max_size).build(manager)?;

    if config.run_migrations {
        let conn = pool.get()?;
        crate::persistence::migrations::run_migrations(&conn)?;
    }

    debug!("Location database pool ready");
    Ok(pool)
}

fn ensure_parent_dir(path: &str) -> Result<(), DatabaseError> {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                DatabaseError::Configuration(format!("Failed to create database directory: {e}"))
            }),
        _ => Ok(()),
    }
}

fn apply_pragmas(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
}
