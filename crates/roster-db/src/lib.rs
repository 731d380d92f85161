//! Database layer for the Roster service.
//!
//! [`open_roster_db`] is the single entry point: it builds the `r2d2` pool,
//! configures every SQLite connection and applies the embedded migrations
//! that create the `students` and `marks` tables.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{configure_connection, open_roster_db, DbPool, DbRuntimeSettings, PoolError, IN_MEMORY};
