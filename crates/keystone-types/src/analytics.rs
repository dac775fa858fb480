//! Analytics read models.

use serde::{Deserialize, Serialize};

use crate::Height;

/// Composite analytics view, computed live at call time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub struct AnalyticsSummary {
    /// Distinct principals active in the current day bucket.
    pub daily_active_users: u64,
    pub total_operations: u64,
    pub contract_version: u64,
    pub maintenance_mode: bool,
    /// Height at which the summary was taken.
    pub current_block: Height,
}
