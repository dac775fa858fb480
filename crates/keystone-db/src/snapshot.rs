//! Whole-contract state persistence.
//!
//! A [`ContractSnapshot`] is written by replacing every row the contract owns,
//! and a mined block is committed together with the snapshots of every
//! contract in a single transaction, so a crash never leaves a block header
//! without its state or the reverse.

use keystone_types::state::ContractSnapshot;
use rusqlite::Connection;

use crate::queries::{access, analytics, blocks, flags, profiles};
use crate::queries::blocks::BlockRow;
use crate::Result;

/// Write the full state of one contract.
///
/// Does not open a transaction of its own; wrap it in one (or use
/// [`persist_block`]) when atomicity across tables matters.
pub fn save(conn: &Connection, contract: &str, snapshot: &ContractSnapshot) -> Result<()> {
    match &snapshot.global {
        Some(global) => access::save_global(conn, contract, global)?,
        None => {
            conn.execute("DELETE FROM global_state WHERE contract = ?1", [contract])?;
        }
    }
    access::replace_authorizations(conn, contract, &snapshot.authorizations)?;
    profiles::replace_all(conn, contract, &snapshot.profiles)?;
    analytics::replace_streaks(conn, contract, &snapshot.streaks)?;
    analytics::replace_daily_active(conn, contract, &snapshot.daily_active)?;
    flags::replace_all(conn, contract, &snapshot.feature_flags)?;
    Ok(())
}

/// Read the full state of one contract. An unknown or never-written
/// contract loads as the empty, uninitialized state.
pub fn load(conn: &Connection, contract: &str) -> Result<ContractSnapshot> {
    Ok(ContractSnapshot {
        global: access::load_global(conn, contract)?,
        authorizations: access::load_authorizations(conn, contract)?,
        profiles: profiles::load_all(conn, contract)?,
        streaks: analytics::load_streaks(conn, contract)?,
        daily_active: analytics::load_daily_active(conn, contract)?,
        feature_flags: flags::load_all(conn, contract)?,
    })
}

/// Commit a block header and the post-block state of every contract.
pub fn persist_block(
    conn: &Connection,
    block: &BlockRow,
    contracts: &[(&str, &ContractSnapshot)],
) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    blocks::insert(&tx, block)?;
    for (name, snapshot) in contracts {
        save(&tx, name, snapshot)?;
    }
    tx.commit()?;
    tracing::debug!(
        height = block.height,
        contracts = contracts.len(),
        "block persisted"
    );
    Ok(())
}
