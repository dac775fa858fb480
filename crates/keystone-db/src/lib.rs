//! # keystone-db
//!
//! SQLite persistence for contract state and block headers.
//!
//! ## Schema
//!
//! - WAL mode, foreign keys enforced
//! - One row set per deployed contract, keyed by contract name
//! - Heights and counters stored as INTEGER (u64 cast through i64)
//! - Schema version stored in `PRAGMA user_version`

pub mod migrations;
pub mod queries;
pub mod schema;
pub mod snapshot;

use rusqlite::Connection;
use std::path::Path;

/// Schema version written to `PRAGMA user_version` by this build.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The file was written by a newer build.
    #[error("schema version {found} is newer than supported {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    /// A stored value no longer decodes into its domain type.
    #[error("corrupt row: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create the chain database at `path`.
pub fn open(path: &Path) -> Result<Connection> {
    prepare(Connection::open(path)?)
}

/// A throwaway in-memory database, used by `Chain::new` and tests.
pub fn open_memory() -> Result<Connection> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(conn: Connection) -> Result<Connection> {
    // journal_mode is ignored for in-memory databases.
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    migrations::run(&conn)?;
    Ok(conn)
}
