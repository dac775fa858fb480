//! Global state and authorization rows.

use std::collections::BTreeMap;

use keystone_types::state::GlobalState;
use keystone_types::Principal;
use rusqlite::{Connection, OptionalExtension};

use crate::Result;

/// Insert or replace the global record of a contract.
pub fn save_global(conn: &Connection, contract: &str, global: &GlobalState) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO global_state
            (contract, owner, initialized, maintenance_mode, paused, total_operations, contract_version)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            contract,
            global.owner.as_str(),
            global.initialized,
            global.maintenance_mode,
            global.paused,
            global.total_operations as i64,
            global.contract_version as i64,
        ],
    )?;
    Ok(())
}

/// The global record, or `None` before initialization.
pub fn load_global(conn: &Connection, contract: &str) -> Result<Option<GlobalState>> {
    let global = conn
        .query_row(
            "SELECT owner, initialized, maintenance_mode, paused, total_operations, contract_version
             FROM global_state WHERE contract = ?1",
            [contract],
            |row| {
                Ok(GlobalState {
                    owner: Principal::new(row.get::<_, String>(0)?),
                    initialized: row.get(1)?,
                    maintenance_mode: row.get(2)?,
                    paused: row.get(3)?,
                    total_operations: row.get::<_, i64>(4)? as u64,
                    contract_version: row.get::<_, i64>(5)? as u64,
                })
            },
        )
        .optional()?;
    Ok(global)
}

/// Replace the authorization rows of a contract.
pub fn replace_authorizations(
    conn: &Connection,
    contract: &str,
    authorizations: &BTreeMap<Principal, bool>,
) -> Result<()> {
    conn.execute("DELETE FROM authorizations WHERE contract = ?1", [contract])?;
    let mut stmt = conn.prepare(
        "INSERT INTO authorizations (contract, principal, authorized) VALUES (?1, ?2, ?3)",
    )?;
    for (principal, authorized) in authorizations {
        stmt.execute(rusqlite::params![contract, principal.as_str(), authorized])?;
    }
    Ok(())
}

pub fn load_authorizations(conn: &Connection, contract: &str) -> Result<BTreeMap<Principal, bool>> {
    let mut stmt =
        conn.prepare("SELECT principal, authorized FROM authorizations WHERE contract = ?1")?;
    let rows = stmt
        .query_map([contract], |row| {
            Ok((Principal::new(row.get::<_, String>(0)?), row.get::<_, bool>(1)?))
        })?
        .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;
    Ok(rows)
}

/// Stored authorization for one principal; absent rows read as `false`.
pub fn is_authorized(conn: &Connection, contract: &str, principal: &Principal) -> Result<bool> {
    let authorized: Option<bool> = conn
        .query_row(
            "SELECT authorized FROM authorizations WHERE contract = ?1 AND principal = ?2",
            rusqlite::params![contract, principal.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(authorized.unwrap_or(false))
}
