//! User profile rows.

use std::collections::BTreeMap;

use keystone_types::profile::UserProfile;
use keystone_types::Principal;
use rusqlite::{Connection, OptionalExtension};

use crate::Result;

/// Replace the profile rows of a contract.
pub fn replace_all(
    conn: &Connection,
    contract: &str,
    profiles: &BTreeMap<Principal, UserProfile>,
) -> Result<()> {
    conn.execute("DELETE FROM user_profiles WHERE contract = ?1", [contract])?;
    let mut stmt = conn.prepare(
        "INSERT INTO user_profiles (contract, principal, created_at, last_activity, reputation_score)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (principal, profile) in profiles {
        stmt.execute(rusqlite::params![
            contract,
            principal.as_str(),
            profile.created_at as i64,
            profile.last_activity as i64,
            profile.reputation_score as i64,
        ])?;
    }
    Ok(())
}

pub fn load_all(conn: &Connection, contract: &str) -> Result<BTreeMap<Principal, UserProfile>> {
    let mut stmt = conn.prepare(
        "SELECT principal, created_at, last_activity, reputation_score
         FROM user_profiles WHERE contract = ?1",
    )?;
    let rows = stmt
        .query_map([contract], |row| {
            Ok((
                Principal::new(row.get::<_, String>(0)?),
                UserProfile {
                    created_at: row.get::<_, i64>(1)? as u64,
                    last_activity: row.get::<_, i64>(2)? as u64,
                    reputation_score: row.get::<_, i64>(3)? as u64,
                },
            ))
        })?
        .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;
    Ok(rows)
}

/// A single profile, if one was created.
pub fn get(conn: &Connection, contract: &str, principal: &Principal) -> Result<Option<UserProfile>> {
    let profile = conn
        .query_row(
            "SELECT created_at, last_activity, reputation_score
             FROM user_profiles WHERE contract = ?1 AND principal = ?2",
            rusqlite::params![contract, principal.as_str()],
            |row| {
                Ok(UserProfile {
                    created_at: row.get::<_, i64>(0)? as u64,
                    last_activity: row.get::<_, i64>(1)? as u64,
                    reputation_score: row.get::<_, i64>(2)? as u64,
                })
            },
        )
        .optional()?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        let conn = crate::open_memory().expect("open test db");
        crate::queries::contracts::insert(&conn, "registry", 0).expect("deploy");
        crate::queries::contracts::insert(&conn, "rentals", 0).expect("deploy");
        conn
    }

    #[test]
    fn test_profiles_round_trip() {
        let conn = test_db();
        let mut profiles = BTreeMap::new();
        profiles.insert(
            Principal::from("ST1"),
            UserProfile {
                created_at: 2,
                last_activity: 9,
                reputation_score: 7,
            },
        );
        profiles.insert(Principal::from("ST2"), UserProfile::new(5));
        replace_all(&conn, "registry", &profiles).expect("save");

        assert_eq!(load_all(&conn, "registry").expect("load"), profiles);
        let one = get(&conn, "registry", &Principal::from("ST1"))
            .expect("get")
            .expect("present");
        assert_eq!(one.reputation_score, 7);
        assert!(get(&conn, "registry", &Principal::from("ST9")).expect("get").is_none());
    }

    #[test]
    fn test_contracts_isolated() {
        let conn = test_db();
        let mut profiles = BTreeMap::new();
        profiles.insert(Principal::from("ST1"), UserProfile::new(1));
        replace_all(&conn, "registry", &profiles).expect("save");
        assert!(load_all(&conn, "rentals").expect("load").is_empty());
    }
}
