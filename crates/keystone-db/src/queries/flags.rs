//! Feature flag rows.

use std::collections::BTreeMap;

use keystone_types::FlagName;
use rusqlite::{Connection, OptionalExtension};

use crate::{DbError, Result};

/// Replace the flag rows of a contract.
pub fn replace_all(conn: &Connection, contract: &str, flags: &BTreeMap<FlagName, bool>) -> Result<()> {
    conn.execute("DELETE FROM feature_flags WHERE contract = ?1", [contract])?;
    let mut stmt =
        conn.prepare("INSERT INTO feature_flags (contract, name, enabled) VALUES (?1, ?2, ?3)")?;
    for (name, enabled) in flags {
        stmt.execute(rusqlite::params![contract, name.as_str(), enabled])?;
    }
    Ok(())
}

/// Load all flags of a contract.
///
/// # Errors
///
/// [`DbError::Serialization`] if a stored name is no longer a valid flag name.
pub fn load_all(conn: &Connection, contract: &str) -> Result<BTreeMap<FlagName, bool>> {
    let mut stmt = conn.prepare("SELECT name, enabled FROM feature_flags WHERE contract = ?1")?;
    let rows = stmt
        .query_map([contract], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(name, enabled)| {
            FlagName::new(name.clone())
                .map(|flag| (flag, enabled))
                .map_err(|e| DbError::Serialization(format!("flag '{name}': {e}")))
        })
        .collect()
}

/// Stored flag value, `None` if never set.
pub fn get(conn: &Connection, contract: &str, name: &FlagName) -> Result<Option<bool>> {
    let enabled = conn
        .query_row(
            "SELECT enabled FROM feature_flags WHERE contract = ?1 AND name = ?2",
            rusqlite::params![contract, name.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(enabled)
}
