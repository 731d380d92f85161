//! Opening the roster database.
//!
//! A [`DbPool`] handed out by [`open_roster_db`] is always ready for use:
//! the `students`/`marks` schema is current, and every connection it yields
//! has gone through [`configure_connection`].

use crate::migrations::{run_migrations, MigrationError};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use std::time::Duration;
use thiserror::Error;

/// Path that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// How long a connection waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to open roster database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: r2d2::Error,
    },

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// Per-connection settings.
///
/// Foreign keys are switched on so deleting a student removes its marks.
/// File databases run in WAL mode; in-memory ones report `memory` and are
/// left as they are.
pub fn configure_connection(conn: &Connection, busy_timeout_ms: u64) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;

    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    match mode.as_str() {
        "wal" | "memory" => Ok(()),
        other => Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some(format!("failed to set WAL journal mode, got: {other}")),
        )),
    }
}

/// Opens (creating if needed) the roster database at `path` and applies
/// pending migrations before returning the pool.
///
/// Every in-memory connection is its own database, so [`IN_MEMORY`] yields
/// a pool of exactly one long-lived connection regardless of `pool_max_size`.
///
/// # Errors
///
/// `PoolError::Open` if no connection can be established,
/// `PoolError::Migration` if the schema cannot be brought up to date.
pub fn open_roster_db(path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let in_memory = path == IN_MEMORY;
    let manager = if in_memory {
        SqliteConnectionManager::memory()
    } else {
        SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
    };
    let busy_timeout_ms = settings.busy_timeout_ms;
    let manager = manager.with_init(move |conn| configure_connection(conn, busy_timeout_ms));

    let max_size = if in_memory { 1 } else { settings.pool_max_size };
    let open_failed = |source| PoolError::Open {
        path: path.to_string(),
        source,
    };
    let mut builder = Pool::<SqliteConnectionManager>::builder().max_size(max_size);
    if in_memory {
        // Recycling the only connection would discard the database.
        builder = builder.idle_timeout(None).max_lifetime(None);
    }
    let pool = builder
        .build(manager)
        .map_err(open_failed)?;

    let applied = {
        let conn = pool.get().map_err(open_failed)?;
        run_migrations(&conn)?
    };
    if applied > 0 {
        tracing::info!(path, count = applied, "applied database migrations");
    }
    tracing::debug!(path, pool_max_size = max_size, busy_timeout_ms, "roster database ready");

    Ok(pool)
}
