//! The call facade.
//!
//! [`Contract::execute`] is the only way to mutate a contract. Each call:
//!
//! 1. runs its guard pipeline ([`crate::guard`]),
//! 2. checks that a counted call can still increment `total_operations`,
//! 3. delegates to exactly one store,
//! 4. on success, commits the counter and returns the emitted event.
//!
//! Every fallible check precedes the first write, so a rejected call leaves
//! the state untouched.

use keystone_types::analytics::AnalyticsSummary;
use keystone_types::events::ContractEvent;
use keystone_types::state::ContractSnapshot;
use keystone_types::{CallKind, CallValue, ContractCall, Height, Principal};

use crate::access::AccessControl;
use crate::analytics::ActivityAnalytics;
use crate::config::ContractConfig;
use crate::flags::FeatureFlagStore;
use crate::guard;
use crate::profiles::UserProfileStore;
use crate::{ContractError, Result};

/// Environment-supplied facts fixed for the duration of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// The principal submitting the call.
    pub caller: Principal,
    /// Current height.
    pub height: Height,
}

impl CallContext {
    pub fn new(caller: impl Into<Principal>, height: Height) -> Self {
        Self {
            caller: caller.into(),
            height,
        }
    }
}

/// Outcome of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub result: Result<CallValue>,
    /// Events committed by the call; empty on failure and for reads.
    pub events: Vec<ContractEvent>,
}

impl Receipt {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Error code of a failed call.
    pub fn error_code(&self) -> Option<u32> {
        self.result.as_ref().err().map(ContractError::code)
    }
}

/// One contract instance: configuration plus the four stores.
#[derive(Debug, Clone)]
pub struct Contract {
    config: ContractConfig,
    access: AccessControl,
    profiles: UserProfileStore,
    analytics: ActivityAnalytics,
    flags: FeatureFlagStore,
}

impl Contract {
    /// A fresh, uninitialized contract.
    ///
    /// # Errors
    ///
    /// - [`ContractError::InvalidParams`] if the configuration is invalid
    pub fn new(config: ContractConfig) -> Result<Self> {
        Self::restore(config, ContractSnapshot::default())
    }

    /// Rebuild a contract from persisted state.
    ///
    /// # Errors
    ///
    /// - [`ContractError::InvalidParams`] if the configuration is invalid
    pub fn restore(config: ContractConfig, snapshot: ContractSnapshot) -> Result<Self> {
        config.validate()?;
        let ContractSnapshot {
            global,
            authorizations,
            profiles,
            streaks,
            daily_active,
            feature_flags,
        } = snapshot;
        Ok(Self {
            config,
            access: AccessControl::from_parts(global, authorizations),
            profiles: UserProfileStore::from_parts(profiles),
            analytics: ActivityAnalytics::from_parts(streaks, daily_active),
            flags: FeatureFlagStore::from_parts(feature_flags),
        })
    }

    /// Copy of the complete state, for persistence.
    pub fn snapshot(&self) -> ContractSnapshot {
        ContractSnapshot {
            global: self.access.global().cloned(),
            authorizations: self.access.authorizations().clone(),
            profiles: self.profiles.profiles().clone(),
            streaks: self.analytics.streaks().clone(),
            daily_active: self.analytics.daily_active().clone(),
            feature_flags: self.flags.flags().clone(),
        }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn profiles(&self) -> &UserProfileStore {
        &self.profiles
    }

    pub fn analytics(&self) -> &ActivityAnalytics {
        &self.analytics
    }

    pub fn flags(&self) -> &FeatureFlagStore {
        &self.flags
    }

    /// Execute any call, read or mutating.
    pub fn execute(&mut self, ctx: &CallContext, call: &ContractCall) -> Receipt {
        let outcome = match call.kind() {
            CallKind::Read => self.query(ctx, call).map(|value| (value, None)),
            CallKind::Admin | CallKind::Operation => self.mutate(ctx, call),
        };

        match outcome {
            Ok((value, event)) => Receipt {
                result: Ok(value),
                events: event.into_iter().collect(),
            },
            Err(err) => {
                tracing::warn!(
                    method = call.method(),
                    caller = %ctx.caller,
                    height = ctx.height,
                    code = err.code(),
                    error = %err,
                    "call rejected"
                );
                Receipt {
                    result: Err(err),
                    events: Vec::new(),
                }
            }
        }
    }

    /// Evaluate a read-only call without the possibility of mutation.
    ///
    /// # Errors
    ///
    /// - [`ContractError::InvalidParams`] if `call` is not read-only
    pub fn read(&self, ctx: &CallContext, call: &ContractCall) -> Result<CallValue> {
        if !call.is_read_only() {
            return Err(ContractError::InvalidParams(format!(
                "{} is not a read-only call",
                call.method()
            )));
        }
        self.query(ctx, call)
    }

    fn mutate(
        &mut self,
        ctx: &CallContext,
        call: &ContractCall,
    ) -> Result<(CallValue, Option<ContractEvent>)> {
        guard::evaluate(&self.access, &ctx.caller, call)?;

        let next_total = match call.kind() {
            CallKind::Operation => Some(
                self.access
                    .total_operations()
                    .checked_add(1)
                    .ok_or(ContractError::Overflow)?,
            ),
            CallKind::Admin | CallKind::Read => None,
        };

        let (value, event) = self.apply(ctx, call)?;

        if let Some(total) = next_total {
            self.access.commit_operation_count(total)?;
        }

        tracing::debug!(
            method = call.method(),
            caller = %ctx.caller,
            height = ctx.height,
            total_operations = self.access.total_operations(),
            "call committed"
        );

        Ok((value, Some(event)))
    }

    /// Delegate a guarded mutating call to its store.
    fn apply(
        &mut self,
        ctx: &CallContext,
        call: &ContractCall,
    ) -> Result<(CallValue, ContractEvent)> {
        let caller = &ctx.caller;
        match call {
            ContractCall::Initialize => {
                self.access.initialize(caller, self.config.contract_version)?;
                Ok((
                    CallValue::Bool(true),
                    ContractEvent::Initialized {
                        owner: caller.clone(),
                        contract_version: self.config.contract_version,
                    },
                ))
            }
            ContractCall::AuthorizeUser { principal } => {
                self.access.set_authorized(principal, true);
                Ok((
                    CallValue::Bool(true),
                    ContractEvent::AuthorizationChanged {
                        principal: principal.clone(),
                        authorized: true,
                    },
                ))
            }
            ContractCall::DeauthorizeUser { principal } => {
                self.access.set_authorized(principal, false);
                Ok((
                    CallValue::Bool(false),
                    ContractEvent::AuthorizationChanged {
                        principal: principal.clone(),
                        authorized: false,
                    },
                ))
            }
            ContractCall::SetMaintenanceMode { enabled } => {
                let enabled = self.access.set_maintenance_mode(*enabled)?;
                Ok((
                    CallValue::Bool(enabled),
                    ContractEvent::MaintenanceModeChanged { enabled },
                ))
            }
            ContractCall::EmergencyPause => {
                self.access.set_paused(true)?;
                Ok((CallValue::Bool(true), ContractEvent::Paused))
            }
            ContractCall::EmergencyResume => {
                self.access.set_paused(false)?;
                Ok((CallValue::Bool(true), ContractEvent::Resumed))
            }
            ContractCall::CreateUserProfile => {
                self.profiles.create(caller, ctx.height)?;
                Ok((
                    CallValue::Bool(true),
                    ContractEvent::ProfileCreated {
                        principal: caller.clone(),
                    },
                ))
            }
            ContractCall::UpdateUserActivity => {
                let profile =
                    self.profiles
                        .touch(caller, ctx.height, self.config.reputation_increment)?;
                Ok((
                    CallValue::Bool(true),
                    ContractEvent::ProfileActivity {
                        principal: caller.clone(),
                        reputation_score: profile.reputation_score,
                    },
                ))
            }
            ContractCall::RecordUserActivity { principal } => {
                let day = self.config.day_bucket(ctx.height);
                let outcome = self.analytics.record(principal, day);
                Ok((
                    CallValue::Bool(true),
                    ContractEvent::ActivityRecorded {
                        principal: principal.clone(),
                        day: outcome.day,
                        streak: outcome.streak,
                    },
                ))
            }
            ContractCall::ResetDailyStats => {
                let day = self.config.day_bucket(ctx.height);
                let cleared = self.analytics.reset_day(day);
                Ok((
                    CallValue::Bool(true),
                    ContractEvent::DailyStatsReset { day, cleared },
                ))
            }
            ContractCall::SetFeatureFlag { name, value } => {
                self.flags.set(name, *value);
                Ok((
                    CallValue::Bool(true),
                    ContractEvent::FeatureFlagChanged {
                        name: name.clone(),
                        value: *value,
                    },
                ))
            }
            ContractCall::IsUserAuthorized { .. }
            | ContractCall::GetContractStatus
            | ContractCall::GetContractOwner
            | ContractCall::GetUserProfile { .. }
            | ContractCall::GetUserActivityStreak { .. }
            | ContractCall::GetDailyActiveUsers
            | ContractCall::GetAnalyticsSummary
            | ContractCall::GetFeatureFlag { .. } => Err(ContractError::InvalidParams(format!(
                "{} is read-only",
                call.method()
            ))),
        }
    }

    /// Answer a read from live state.
    fn query(&self, ctx: &CallContext, call: &ContractCall) -> Result<CallValue> {
        let value = match call {
            ContractCall::IsUserAuthorized { principal } => {
                CallValue::Bool(self.access.is_authorized(principal))
            }
            ContractCall::GetContractStatus => CallValue::Bool(self.access.is_operational()),
            ContractCall::GetContractOwner => CallValue::Principal(self.access.owner().cloned()),
            ContractCall::GetUserProfile { principal } => {
                CallValue::Profile(self.profiles.get(principal).cloned())
            }
            ContractCall::GetUserActivityStreak { principal } => {
                CallValue::Uint(self.analytics.streak(principal))
            }
            ContractCall::GetDailyActiveUsers => {
                CallValue::Uint(self.daily_active_users(ctx.height))
            }
            ContractCall::GetAnalyticsSummary => CallValue::Summary(self.summary(ctx.height)),
            ContractCall::GetFeatureFlag { name } => CallValue::Bool(self.flags.get(name)),
            _ => {
                return Err(ContractError::InvalidParams(format!(
                    "{} is not a read-only call",
                    call.method()
                )))
            }
        };
        tracing::trace!(method = call.method(), height = ctx.height, "read answered");
        Ok(value)
    }

    /// Distinct principals active in the bucket containing `height`.
    pub fn daily_active_users(&self, height: Height) -> u64 {
        self.analytics
            .daily_active_count(self.config.day_bucket(height))
    }

    /// Live analytics summary at `height`.
    pub fn summary(&self, height: Height) -> AnalyticsSummary {
        AnalyticsSummary {
            daily_active_users: self.daily_active_users(height),
            total_operations: self.access.total_operations(),
            contract_version: self
                .access
                .contract_version()
                .unwrap_or(self.config.contract_version),
            maintenance_mode: self.access.maintenance_mode(),
            current_block: height,
        }
    }
}
