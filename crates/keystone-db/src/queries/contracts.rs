//! Deployed contract registry.

use rusqlite::Connection;

use crate::{DbError, Result};

/// A deployed contract row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRow {
    pub name: String,
    /// Height at which the contract was deployed.
    pub deployed_at: u64,
}

/// Register a contract name.
pub fn insert(conn: &Connection, name: &str, deployed_at: u64) -> Result<()> {
    if exists(conn, name)? {
        return Err(DbError::Constraint(format!("contract '{name}' already deployed")));
    }
    conn.execute(
        "INSERT INTO contracts (name, deployed_at) VALUES (?1, ?2)",
        rusqlite::params![name, deployed_at as i64],
    )?;
    Ok(())
}

pub fn exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM contracts WHERE name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// All deployed contracts, oldest first.
pub fn list(conn: &Connection) -> Result<Vec<ContractRow>> {
    let mut stmt =
        conn.prepare("SELECT name, deployed_at FROM contracts ORDER BY deployed_at, name")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ContractRow {
                name: row.get(0)?,
                deployed_at: row.get::<_, i64>(1)? as u64,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
