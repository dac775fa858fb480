//! Ordered guard pipeline.
//!
//! Each call maps to a fixed list of predicates evaluated in order before
//! delegation. The first failing guard decides the error; nothing is
//! mutated until every guard has passed.

use keystone_types::{ContractCall, Principal};

use crate::access::AccessControl;
use crate::{ContractError, Result};

/// A single precondition on a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The contract has not been initialized yet.
    Uninitialized,
    /// The contract has been initialized.
    Initialized,
    /// The caller is the owner.
    Owner,
    /// The caller is in the authorization set.
    CallerAuthorized,
    /// The principal named by the call is in the authorization set.
    SubjectAuthorized,
    /// Maintenance mode is off.
    NotInMaintenance,
    /// The contract is not paused.
    NotPaused,
}

const NONE: &[Guard] = &[];
const INITIALIZE: &[Guard] = &[Guard::Uninitialized];
const OWNER_ONLY: &[Guard] = &[Guard::Initialized, Guard::Owner];
const SELF_SERVICE: &[Guard] = &[Guard::Initialized, Guard::NotInMaintenance];
const RECORD_ACTIVITY: &[Guard] = &[
    Guard::Initialized,
    Guard::SubjectAuthorized,
    Guard::NotInMaintenance,
    Guard::NotPaused,
];
const AUTHORIZED_ONLY: &[Guard] = &[Guard::Initialized, Guard::CallerAuthorized];

/// Guards for `call`, in evaluation order. Reads have none.
pub fn pipeline(call: &ContractCall) -> &'static [Guard] {
    match call {
        ContractCall::Initialize => INITIALIZE,

        ContractCall::AuthorizeUser { .. }
        | ContractCall::DeauthorizeUser { .. }
        | ContractCall::SetMaintenanceMode { .. }
        | ContractCall::EmergencyPause
        | ContractCall::EmergencyResume
        | ContractCall::ResetDailyStats => OWNER_ONLY,

        ContractCall::CreateUserProfile | ContractCall::UpdateUserActivity => SELF_SERVICE,

        ContractCall::RecordUserActivity { .. } => RECORD_ACTIVITY,

        ContractCall::SetFeatureFlag { .. } => AUTHORIZED_ONLY,

        ContractCall::IsUserAuthorized { .. }
        | ContractCall::GetContractStatus
        | ContractCall::GetContractOwner
        | ContractCall::GetUserProfile { .. }
        | ContractCall::GetUserActivityStreak { .. }
        | ContractCall::GetDailyActiveUsers
        | ContractCall::GetAnalyticsSummary
        | ContractCall::GetFeatureFlag { .. } => NONE,
    }
}

impl Guard {
    /// Evaluate this guard.
    ///
    /// # Errors
    ///
    /// The error matching the failed precondition.
    pub fn check(
        self,
        access: &AccessControl,
        caller: &Principal,
        call: &ContractCall,
    ) -> Result<()> {
        match self {
            Guard::Uninitialized => {
                if access.is_initialized() {
                    return Err(ContractError::AlreadyInitialized);
                }
            }
            Guard::Initialized => {
                if !access.is_initialized() {
                    return Err(ContractError::NotInitialized);
                }
            }
            Guard::Owner => {
                if !access.is_owner(caller) {
                    return Err(ContractError::NotOwner(caller.clone()));
                }
            }
            Guard::CallerAuthorized => {
                if !access.is_authorized(caller) {
                    return Err(ContractError::NotAuthorized(caller.clone()));
                }
            }
            Guard::SubjectAuthorized => {
                let subject = call.subject().ok_or_else(|| {
                    ContractError::InvalidParams(format!("{} names no principal", call.method()))
                })?;
                if !access.is_authorized(subject) {
                    return Err(ContractError::NotAuthorized(subject.clone()));
                }
            }
            Guard::NotInMaintenance => {
                if access.maintenance_mode() {
                    return Err(ContractError::MaintenanceActive);
                }
            }
            Guard::NotPaused => {
                if access.paused() {
                    return Err(ContractError::Paused);
                }
            }
        }
        Ok(())
    }
}

/// Run the full pipeline for `call`.
///
/// # Errors
///
/// The error of the first guard that fails.
pub fn evaluate(access: &AccessControl, caller: &Principal, call: &ContractCall) -> Result<()> {
    for guard in pipeline(call) {
        guard.check(access, caller, call)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (AccessControl, Principal, Principal) {
        let owner = Principal::from("ST1OWNER");
        let user = Principal::from("ST2USER");
        let mut access = AccessControl::new();
        access.initialize(&owner, 1).expect("initialize");
        (access, owner, user)
    }

    #[test]
    fn test_reads_have_no_guards() {
        assert!(pipeline(&ContractCall::GetDailyActiveUsers).is_empty());
        let access = AccessControl::new();
        evaluate(&access, &Principal::from("ST9"), &ContractCall::GetContractStatus)
            .expect("reads pass before initialize");
    }

    #[test]
    fn test_mutations_require_initialization() {
        let access = AccessControl::new();
        let caller = Principal::from("ST1");
        for call in [
            ContractCall::CreateUserProfile,
            ContractCall::ResetDailyStats,
            ContractCall::RecordUserActivity { principal: caller.clone() },
        ] {
            assert_eq!(
                evaluate(&access, &caller, &call),
                Err(ContractError::NotInitialized)
            );
        }
    }

    #[test]
    fn test_initialize_only_once() {
        let (access, owner, _) = setup();
        assert_eq!(
            evaluate(&access, &owner, &ContractCall::Initialize),
            Err(ContractError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_owner_only_calls() {
        let (access, owner, user) = setup();
        let call = ContractCall::AuthorizeUser { principal: user.clone() };
        evaluate(&access, &owner, &call).expect("owner passes");
        assert_eq!(
            evaluate(&access, &user, &call),
            Err(ContractError::NotOwner(user.clone()))
        );
    }

    #[test]
    fn test_record_activity_checks_subject_not_caller() {
        let (mut access, owner, user) = setup();
        let call = ContractCall::RecordUserActivity { principal: user.clone() };
        assert_eq!(
            evaluate(&access, &owner, &call),
            Err(ContractError::NotAuthorized(user.clone()))
        );
        access.set_authorized(&user, true);
        evaluate(&access, &owner, &call).expect("subject authorized");
    }

    #[test]
    fn test_record_activity_guard_order() {
        let (mut access, owner, user) = setup();
        let call = ContractCall::RecordUserActivity { principal: user.clone() };
        access.set_maintenance_mode(true).expect("maintenance");
        access.set_paused(true).expect("pause");

        // Unauthorized wins over maintenance and pause.
        assert_eq!(
            evaluate(&access, &owner, &call),
            Err(ContractError::NotAuthorized(user.clone()))
        );
        access.set_authorized(&user, true);
        assert_eq!(
            evaluate(&access, &owner, &call),
            Err(ContractError::MaintenanceActive)
        );
        access.set_maintenance_mode(false).expect("maintenance off");
        assert_eq!(evaluate(&access, &owner, &call), Err(ContractError::Paused));
    }

    #[test]
    fn test_feature_flag_requires_caller_authorization() {
        let (mut access, owner, user) = setup();
        let call = ContractCall::SetFeatureFlag {
            name: keystone_types::FlagName::new("beta").expect("name"),
            value: true,
        };
        assert_eq!(
            evaluate(&access, &owner, &call),
            Err(ContractError::NotAuthorized(owner.clone()))
        );
        access.set_authorized(&user, true);
        evaluate(&access, &user, &call).expect("authorized caller");
    }

    #[test]
    fn test_profile_calls_blocked_in_maintenance() {
        let (mut access, _, user) = setup();
        access.set_maintenance_mode(true).expect("maintenance");
        let err = evaluate(&access, &user, &ContractCall::CreateUserProfile)
            .expect_err("blocked");
        assert_eq!(err.code(), crate::ERR_INVALID_PARAMS);
    }
}
