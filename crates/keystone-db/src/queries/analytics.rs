//! Streak and daily-active rows.

use std::collections::{BTreeMap, BTreeSet};

use keystone_types::profile::StreakRecord;
use keystone_types::{DayBucket, Principal};
use rusqlite::Connection;

use crate::Result;

/// Replace the streak rows of a contract.
pub fn replace_streaks(
    conn: &Connection,
    contract: &str,
    streaks: &BTreeMap<Principal, StreakRecord>,
) -> Result<()> {
    conn.execute("DELETE FROM activity_streaks WHERE contract = ?1", [contract])?;
    let mut stmt = conn.prepare(
        "INSERT INTO activity_streaks (contract, principal, current_streak, last_activity_day)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (principal, record) in streaks {
        stmt.execute(rusqlite::params![
            contract,
            principal.as_str(),
            record.current_streak as i64,
            record.last_activity_day as i64,
        ])?;
    }
    Ok(())
}

pub fn load_streaks(conn: &Connection, contract: &str) -> Result<BTreeMap<Principal, StreakRecord>> {
    let mut stmt = conn.prepare(
        "SELECT principal, current_streak, last_activity_day
         FROM activity_streaks WHERE contract = ?1",
    )?;
    let rows = stmt
        .query_map([contract], |row| {
            Ok((
                Principal::new(row.get::<_, String>(0)?),
                StreakRecord {
                    current_streak: row.get::<_, i64>(1)? as u64,
                    last_activity_day: row.get::<_, i64>(2)? as u64,
                },
            ))
        })?
        .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;
    Ok(rows)
}

/// Replace the daily-active membership of a contract.
///
/// Empty buckets are not stored; a reset bucket reads back as absent.
pub fn replace_daily_active(
    conn: &Connection,
    contract: &str,
    daily_active: &BTreeMap<DayBucket, BTreeSet<Principal>>,
) -> Result<()> {
    conn.execute("DELETE FROM daily_active_users WHERE contract = ?1", [contract])?;
    let mut stmt = conn.prepare(
        "INSERT INTO daily_active_users (contract, day_bucket, principal) VALUES (?1, ?2, ?3)",
    )?;
    for (day, members) in daily_active {
        for principal in members {
            stmt.execute(rusqlite::params![contract, *day as i64, principal.as_str()])?;
        }
    }
    Ok(())
}

pub fn load_daily_active(
    conn: &Connection,
    contract: &str,
) -> Result<BTreeMap<DayBucket, BTreeSet<Principal>>> {
    let mut stmt = conn.prepare(
        "SELECT day_bucket, principal FROM daily_active_users
         WHERE contract = ?1 ORDER BY day_bucket",
    )?;
    let rows = stmt
        .query_map([contract], |row| {
            Ok((
                row.get::<_, i64>(0)? as u64,
                Principal::new(row.get::<_, String>(1)?),
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut buckets: BTreeMap<DayBucket, BTreeSet<Principal>> = BTreeMap::new();
    for (day, principal) in rows {
        buckets.entry(day).or_default().insert(principal);
    }
    Ok(buckets)
}

/// Number of distinct principals active in `day`.
pub fn daily_active_count(conn: &Connection, contract: &str, day: DayBucket) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM daily_active_users WHERE contract = ?1 AND day_bucket = ?2",
        rusqlite::params![contract, day as i64],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}
