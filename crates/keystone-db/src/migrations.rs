//! Schema versioning.
//!
//! The version is stored in `PRAGMA user_version`. Only one schema version
//! exists: a fresh database gets it, a current one is left alone, and a newer
//! one is refused.

use rusqlite::Connection;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Bring the database to [`SCHEMA_VERSION`].
pub fn run(conn: &Connection) -> Result<()> {
    let current_version: u32 =
        conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchema {
            found: current_version,
            supported: SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        tracing::info!(version = SCHEMA_VERSION, "creating keystone schema");
        conn.execute_batch(schema::SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Connection {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch("PRAGMA foreign_keys = ON;").expect("pragma");
        conn
    }

    #[test]
    fn test_fresh_migration() {
        let conn = fresh();
        run(&conn).expect("migrate");

        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("version");
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_idempotent_migration() {
        let conn = fresh();
        run(&conn).expect("first run");
        run(&conn).expect("second run should be no-op");
    }

    #[test]
    fn test_newer_database_rejected() {
        let conn = fresh();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .expect("bump version");
        assert!(matches!(
            run(&conn),
            Err(DbError::UnsupportedSchema { found, supported: SCHEMA_VERSION })
                if found == SCHEMA_VERSION + 1
        ));
    }

    #[test]
    fn test_current_version_left_untouched() {
        let conn = fresh();
        run(&conn).expect("migrate");
        conn.execute("INSERT INTO contracts (name, deployed_at) VALUES ('registry', 0)", [])
            .expect("insert");
        run(&conn).expect("rerun");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM contracts", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_tables_created() {
        let conn = fresh();
        run(&conn).expect("migrate");

        let expected_tables = [
            "contracts",
            "global_state",
            "authorizations",
            "user_profiles",
            "activity_streaks",
            "daily_active_users",
            "feature_flags",
            "blocks",
        ];

        for table in &expected_tables {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .expect("table check");
            assert_eq!(count, 1, "Table '{table}' should exist");
        }
    }
}
