//! Per-principal records.

use serde::{Deserialize, Serialize};

use crate::{DayBucket, Height};

/// Profile record, created once per principal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub struct UserProfile {
    /// Height at which the profile was created.
    pub created_at: Height,
    /// Height of the most recent profile activity update.
    pub last_activity: Height,
    pub reputation_score: u64,
}

impl UserProfile {
    /// A fresh profile created at `now`.
    pub fn new(now: Height) -> Self {
        Self {
            created_at: now,
            last_activity: now,
            reputation_score: 0,
        }
    }
}

/// Activity streak state, created lazily on first recorded activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub struct StreakRecord {
    /// Consecutive day buckets with at least one recorded activity.
    pub current_streak: u64,
    pub last_activity_day: DayBucket,
}
