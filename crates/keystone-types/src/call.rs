//! Call and value envelopes for the contract call surface.
//!
//! A [`ContractCall`] serializes as `{"method": "<kebab-name>", "args": {...}}`
//! so JSON clients can name methods the same way the call surface does.

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsSummary;
use crate::profile::UserProfile;
use crate::{FlagName, Principal};

/// Every call the contract accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "kebab-case")]
pub enum ContractCall {
    // Access control
    Initialize,
    AuthorizeUser { principal: Principal },
    DeauthorizeUser { principal: Principal },
    IsUserAuthorized { principal: Principal },
    SetMaintenanceMode { enabled: bool },
    EmergencyPause,
    EmergencyResume,
    GetContractStatus,
    GetContractOwner,

    // Profiles
    CreateUserProfile,
    GetUserProfile { principal: Principal },
    UpdateUserActivity,

    // Analytics
    RecordUserActivity { principal: Principal },
    GetUserActivityStreak { principal: Principal },
    GetDailyActiveUsers,
    ResetDailyStats,
    GetAnalyticsSummary,

    // Feature flags
    SetFeatureFlag { name: FlagName, value: bool },
    GetFeatureFlag { name: FlagName },
}

/// How a call interacts with contract state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    /// Pure read; never mutates.
    Read,
    /// Bootstrap or housekeeping call (`initialize`, `reset-daily-stats`);
    /// not counted in `total_operations`.
    Admin,
    /// Mutating call counted once in `total_operations` on success.
    Operation,
}

impl ContractCall {
    /// The kebab-case method name of the call surface.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::AuthorizeUser { .. } => "authorize-user",
            Self::DeauthorizeUser { .. } => "deauthorize-user",
            Self::IsUserAuthorized { .. } => "is-user-authorized",
            Self::SetMaintenanceMode { .. } => "set-maintenance-mode",
            Self::EmergencyPause => "emergency-pause",
            Self::EmergencyResume => "emergency-resume",
            Self::GetContractStatus => "get-contract-status",
            Self::GetContractOwner => "get-contract-owner",
            Self::CreateUserProfile => "create-user-profile",
            Self::GetUserProfile { .. } => "get-user-profile",
            Self::UpdateUserActivity => "update-user-activity",
            Self::RecordUserActivity { .. } => "record-user-activity",
            Self::GetUserActivityStreak { .. } => "get-user-activity-streak",
            Self::GetDailyActiveUsers => "get-daily-active-users",
            Self::ResetDailyStats => "reset-daily-stats",
            Self::GetAnalyticsSummary => "get-analytics-summary",
            Self::SetFeatureFlag { .. } => "set-feature-flag",
            Self::GetFeatureFlag { .. } => "get-feature-flag",
        }
    }

    pub fn kind(&self) -> CallKind {
        match self {
            Self::IsUserAuthorized { .. }
            | Self::GetContractStatus
            | Self::GetContractOwner
            | Self::GetUserProfile { .. }
            | Self::GetUserActivityStreak { .. }
            | Self::GetDailyActiveUsers
            | Self::GetAnalyticsSummary
            | Self::GetFeatureFlag { .. } => CallKind::Read,

            Self::Initialize | Self::ResetDailyStats => CallKind::Admin,

            Self::AuthorizeUser { .. }
            | Self::SetMaintenanceMode { .. }
            | Self::EmergencyPause
            | Self::EmergencyResume
            | Self::DeauthorizeUser { .. }
            | Self::CreateUserProfile
            | Self::UpdateUserActivity
            | Self::RecordUserActivity { .. }
            | Self::SetFeatureFlag { .. } => CallKind::Operation,
        }
    }

    /// Whether the call is a pure read.
    pub fn is_read_only(&self) -> bool {
        self.kind() == CallKind::Read
    }

    /// The principal a call acts upon, when it names one explicitly.
    pub fn subject(&self) -> Option<&Principal> {
        match self {
            Self::AuthorizeUser { principal }
            | Self::DeauthorizeUser { principal }
            | Self::IsUserAuthorized { principal }
            | Self::GetUserProfile { principal }
            | Self::RecordUserActivity { principal }
            | Self::GetUserActivityStreak { principal } => Some(principal),
            _ => None,
        }
    }
}

/// Value carried by a successful call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CallValue {
    Bool(bool),
    Uint(u64),
    Principal(Option<Principal>),
    Profile(Option<UserProfile>),
    Summary(AnalyticsSummary),
}

impl CallValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(n) => Some(*n),
            _ => None,
        }
    }

    /// The profile, if this is a `Profile` value holding one.
    pub fn as_profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Profile(profile) => profile.as_ref(),
            _ => None,
        }
    }

    pub fn as_summary(&self) -> Option<&AnalyticsSummary> {
        match self {
            Self::Summary(summary) => Some(summary),
            _ => None,
        }
    }

    /// The principal, if this is a `Principal` value holding one.
    pub fn as_principal(&self) -> Option<&Principal> {
        match self {
            Self::Principal(p) => p.as_ref(),
            _ => None,
        }
    }
}
