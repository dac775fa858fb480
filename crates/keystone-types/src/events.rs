//! Events emitted by successful mutating calls.
//!
//! One event per committed call; a rejected call emits nothing.

use serde::{Deserialize, Serialize};

use crate::{DayBucket, FlagName, Principal};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ContractEvent {
    Initialized {
        owner: Principal,
        contract_version: u64,
    },
    AuthorizationChanged {
        principal: Principal,
        authorized: bool,
    },
    MaintenanceModeChanged {
        enabled: bool,
    },
    Paused,
    Resumed,
    ProfileCreated {
        principal: Principal,
    },
    ProfileActivity {
        principal: Principal,
        reputation_score: u64,
    },
    ActivityRecorded {
        principal: Principal,
        day: DayBucket,
        streak: u64,
    },
    DailyStatsReset {
        day: DayBucket,
        cleared: u64,
    },
    FeatureFlagChanged {
        #[ts(type = "string")]
        name: FlagName,
        value: bool,
    },
}
