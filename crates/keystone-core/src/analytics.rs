//! Activity analytics: day bucketing, streaks and daily active sets.
//!
//! ## Day buckets
//!
//! ```text
//! day_bucket(height) = height / blocks_per_day
//! ```
//!
//! Buckets derive from height only, never from wall-clock time, so the
//! analytics are reproducible from the height sequence alone.
//!
//! ## Streak transitions
//!
//! For a principal acting in bucket `d` with a previous record at `last`:
//!
//! | Condition | New streak |
//! |---|---|
//! | no record | 1 |
//! | `d == last` | unchanged |
//! | `d == last + 1` | streak + 1 |
//! | `d > last + 1` | 1 |
//!
//! Daily active sets are cleared only by an explicit reset, never by day
//! rollover, so past buckets keep their membership.

use std::collections::{BTreeMap, BTreeSet};

use keystone_types::profile::StreakRecord;
use keystone_types::{DayBucket, Height, Principal};

/// Bucket containing `height` for a bucket width of `blocks_per_day`.
///
/// A zero width is treated as one; [`crate::ContractConfig::validate`]
/// rejects it before a contract is built.
pub fn day_bucket(height: Height, blocks_per_day: u64) -> DayBucket {
    height / blocks_per_day.max(1)
}

/// Apply the streak transition rule for activity in bucket `day`.
pub fn next_streak(previous: Option<&StreakRecord>, day: DayBucket) -> StreakRecord {
    let Some(prev) = previous else {
        return StreakRecord {
            current_streak: 1,
            last_activity_day: day,
        };
    };

    if day <= prev.last_activity_day {
        // Same bucket counts once. An earlier bucket only happens if the
        // height went backwards; the record is left as is.
        return *prev;
    }

    let current_streak = if day == prev.last_activity_day + 1 {
        prev.current_streak.saturating_add(1)
    } else {
        1
    };

    StreakRecord {
        current_streak,
        last_activity_day: day,
    }
}

/// Result of recording one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityOutcome {
    pub day: DayBucket,
    pub streak: u64,
    /// `false` if the principal was already in the day's active set.
    pub newly_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityAnalytics {
    streaks: BTreeMap<Principal, StreakRecord>,
    daily_active: BTreeMap<DayBucket, BTreeSet<Principal>>,
}

impl ActivityAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        streaks: BTreeMap<Principal, StreakRecord>,
        daily_active: BTreeMap<DayBucket, BTreeSet<Principal>>,
    ) -> Self {
        Self {
            streaks,
            daily_active,
        }
    }

    pub fn streaks(&self) -> &BTreeMap<Principal, StreakRecord> {
        &self.streaks
    }

    pub fn daily_active(&self) -> &BTreeMap<DayBucket, BTreeSet<Principal>> {
        &self.daily_active
    }

    /// Record an activity for `principal` in bucket `day`.
    pub fn record(&mut self, principal: &Principal, day: DayBucket) -> ActivityOutcome {
        let record = next_streak(self.streaks.get(principal), day);
        self.streaks.insert(principal.clone(), record);

        let newly_active = self
            .daily_active
            .entry(day)
            .or_default()
            .insert(principal.clone());

        tracing::debug!(
            %principal,
            day,
            streak = record.current_streak,
            newly_active,
            "activity recorded"
        );

        ActivityOutcome {
            day,
            streak: record.current_streak,
            newly_active,
        }
    }

    /// Current streak, or 0 for a principal with no recorded activity.
    pub fn streak(&self, principal: &Principal) -> u64 {
        self.streaks
            .get(principal)
            .map_or(0, |record| record.current_streak)
    }

    pub fn streak_record(&self, principal: &Principal) -> Option<&StreakRecord> {
        self.streaks.get(principal)
    }

    /// Number of distinct principals active in `day`.
    pub fn daily_active_count(&self, day: DayBucket) -> u64 {
        self.daily_active
            .get(&day)
            .map_or(0, |members| members.len() as u64)
    }

    pub fn is_active_on(&self, principal: &Principal, day: DayBucket) -> bool {
        self.daily_active
            .get(&day)
            .is_some_and(|members| members.contains(principal))
    }

    /// Clear the membership of `day`, returning how many principals were removed.
    ///
    /// Streaks and other buckets are untouched.
    pub fn reset_day(&mut self, day: DayBucket) -> u64 {
        let cleared = self
            .daily_active
            .remove(&day)
            .map_or(0, |members| members.len() as u64);
        tracing::info!(day, cleared, "daily active set reset");
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(streak: u64, day: DayBucket) -> StreakRecord {
        StreakRecord {
            current_streak: streak,
            last_activity_day: day,
        }
    }

    #[test]
    fn test_day_bucket_boundaries() {
        assert_eq!(day_bucket(0, 144), 0);
        assert_eq!(day_bucket(143, 144), 0);
        assert_eq!(day_bucket(144, 144), 1);
        assert_eq!(day_bucket(289, 144), 2);
        assert_eq!(day_bucket(5, 1), 5);
        assert_eq!(day_bucket(5, 0), 5);
    }

    #[test]
    fn test_first_activity_starts_streak() {
        assert_eq!(next_streak(None, 9), record(1, 9));
    }

    #[test]
    fn test_same_day_unchanged() {
        assert_eq!(next_streak(Some(&record(4, 9)), 9), record(4, 9));
    }

    #[test]
    fn test_next_day_increments() {
        assert_eq!(next_streak(Some(&record(4, 9)), 10), record(5, 10));
    }

    #[test]
    fn test_gap_resets() {
        assert_eq!(next_streak(Some(&record(4, 9)), 11), record(1, 11));
        assert_eq!(next_streak(Some(&record(4, 9)), 500), record(1, 500));
    }

    #[test]
    fn test_earlier_day_leaves_record() {
        assert_eq!(next_streak(Some(&record(4, 9)), 3), record(4, 9));
    }

    #[test]
    fn test_streak_saturates() {
        let next = next_streak(Some(&record(u64::MAX, 1)), 2);
        assert_eq!(next.current_streak, u64::MAX);
    }

    #[test]
    fn test_consecutive_days_build_streak() {
        let mut analytics = ActivityAnalytics::new();
        let p = Principal::from("ST1");
        for day in 10..13 {
            analytics.record(&p, day);
        }
        assert_eq!(analytics.streak(&p), 3);

        analytics.record(&p, 14);
        assert_eq!(analytics.streak(&p), 1);
    }

    #[test]
    fn test_daily_active_membership_is_idempotent() {
        let mut analytics = ActivityAnalytics::new();
        let a = Principal::from("ST1");
        let b = Principal::from("ST2");

        assert!(analytics.record(&a, 4).newly_active);
        assert!(!analytics.record(&a, 4).newly_active);
        assert_eq!(analytics.daily_active_count(4), 1);

        analytics.record(&b, 4);
        assert_eq!(analytics.daily_active_count(4), 2);
        assert_eq!(analytics.daily_active_count(5), 0);
    }

    #[test]
    fn test_rollover_keeps_old_buckets() {
        let mut analytics = ActivityAnalytics::new();
        let a = Principal::from("ST1");
        analytics.record(&a, 4);
        analytics.record(&a, 5);
        assert!(analytics.is_active_on(&a, 4));
        assert!(analytics.is_active_on(&a, 5));
    }

    #[test]
    fn test_reset_day_only_touches_that_day() {
        let mut analytics = ActivityAnalytics::new();
        let a = Principal::from("ST1");
        analytics.record(&a, 4);
        analytics.record(&a, 5);

        assert_eq!(analytics.reset_day(5), 1);
        assert_eq!(analytics.daily_active_count(5), 0);
        assert_eq!(analytics.daily_active_count(4), 1);
        assert_eq!(analytics.streak(&a), 2);
        assert_eq!(analytics.reset_day(5), 0);
    }

    #[test]
    fn test_unknown_principal_streak_zero() {
        let analytics = ActivityAnalytics::new();
        assert_eq!(analytics.streak(&Principal::from("ST404")), 0);
        assert!(analytics.streak_record(&Principal::from("ST404")).is_none());
    }
}
