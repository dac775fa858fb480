//! Block header rows.

use rusqlite::{Connection, OptionalExtension};

use crate::{DbError, Result};

/// A mined block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    pub height: u64,
    pub hash: [u8; 32],
    pub parent_hash: [u8; 32],
    pub tx_count: u32,
    /// Transactions whose call was rejected.
    pub failed_count: u32,
}

pub fn insert(conn: &Connection, block: &BlockRow) -> Result<()> {
    conn.execute(
        "INSERT INTO blocks (height, hash, parent_hash, tx_count, failed_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            block.height as i64,
            block.hash.as_slice(),
            block.parent_hash.as_slice(),
            block.tx_count,
            block.failed_count,
        ],
    )?;
    Ok(())
}

/// Block at a given height.
pub fn get(conn: &Connection, height: u64) -> Result<BlockRow> {
    conn.query_row(
        "SELECT height, hash, parent_hash, tx_count, failed_count FROM blocks WHERE height = ?1",
        [height as i64],
        read_row,
    )
    .optional()?
    .ok_or_else(|| DbError::NotFound(format!("block {height}")))?
}

/// Highest stored block, `None` on a fresh chain.
pub fn tip(conn: &Connection) -> Result<Option<BlockRow>> {
    conn.query_row(
        "SELECT height, hash, parent_hash, tx_count, failed_count
         FROM blocks ORDER BY height DESC LIMIT 1",
        [],
        read_row,
    )
    .optional()?
    .transpose()
}

/// Blocks in ascending height order, starting at `from`.
pub fn range(conn: &Connection, from: u64, limit: u32) -> Result<Vec<BlockRow>> {
    let mut stmt = conn.prepare(
        "SELECT height, hash, parent_hash, tx_count, failed_count
         FROM blocks WHERE height >= ?1 ORDER BY height LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![from as i64, limit], read_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().collect()
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<BlockRow>> {
    let height = row.get::<_, i64>(0)? as u64;
    let hash: Vec<u8> = row.get(1)?;
    let parent_hash: Vec<u8> = row.get(2)?;
    let tx_count: u32 = row.get(3)?;
    let failed_count: u32 = row.get(4)?;
    let block = to_hash(hash).and_then(|hash| {
        Ok(BlockRow {
            height,
            hash,
            parent_hash: to_hash(parent_hash)?,
            tx_count,
            failed_count,
        })
    });
    Ok(block)
}

fn to_hash(bytes: Vec<u8>) -> Result<[u8; 32]> {
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| DbError::Serialization(format!("hash is {} bytes, expected 32", v.len())))
}
