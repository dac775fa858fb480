//! Persisted contract state.
//!
//! [`ContractSnapshot`] is the complete state of one contract instance: the
//! global record plus the five per-key tables. It is what the storage layer
//! writes and what the core restores from.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::profile::{StreakRecord, UserProfile};
use crate::{DayBucket, FlagName, Principal};

/// Singleton global record, present once the contract is initialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalState {
    pub owner: Principal,
    pub initialized: bool,
    pub maintenance_mode: bool,
    pub paused: bool,
    /// Successful counted calls since initialization. Never decreases.
    pub total_operations: u64,
    pub contract_version: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    /// `None` until `initialize` succeeds.
    pub global: Option<GlobalState>,
    pub authorizations: BTreeMap<Principal, bool>,
    pub profiles: BTreeMap<Principal, UserProfile>,
    pub streaks: BTreeMap<Principal, StreakRecord>,
    pub daily_active: BTreeMap<DayBucket, BTreeSet<Principal>>,
    pub feature_flags: BTreeMap<FlagName, bool>,
}
