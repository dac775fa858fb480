//! Owner, authorization set, maintenance and pause switches.
//!
//! Owns the [`GlobalState`] record. Ownership checks live in the guard
//! pipeline; the methods here assume the caller has already been vetted.

use std::collections::BTreeMap;

use keystone_types::state::GlobalState;
use keystone_types::Principal;

use crate::{ContractError, Result};

#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    global: Option<GlobalState>,
    authorizations: BTreeMap<Principal, bool>,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts.
    pub fn from_parts(
        global: Option<GlobalState>,
        authorizations: BTreeMap<Principal, bool>,
    ) -> Self {
        Self {
            global,
            authorizations,
        }
    }

    pub fn global(&self) -> Option<&GlobalState> {
        self.global.as_ref()
    }

    pub fn authorizations(&self) -> &BTreeMap<Principal, bool> {
        &self.authorizations
    }

    pub fn is_initialized(&self) -> bool {
        self.global.as_ref().is_some_and(|g| g.initialized)
    }

    pub fn owner(&self) -> Option<&Principal> {
        self.global.as_ref().map(|g| &g.owner)
    }

    pub fn is_owner(&self, principal: &Principal) -> bool {
        self.owner() == Some(principal)
    }

    /// Create the global record with `caller` as owner.
    ///
    /// # Errors
    ///
    /// - [`ContractError::AlreadyInitialized`] if the record already exists
    pub fn initialize(&mut self, caller: &Principal, contract_version: u64) -> Result<()> {
        if self.is_initialized() {
            return Err(ContractError::AlreadyInitialized);
        }
        self.global = Some(GlobalState {
            owner: caller.clone(),
            initialized: true,
            maintenance_mode: false,
            paused: false,
            total_operations: 0,
            contract_version,
        });
        tracing::info!(owner = %caller, contract_version, "contract initialized");
        Ok(())
    }

    /// Absent entries read as `false`.
    pub fn is_authorized(&self, principal: &Principal) -> bool {
        self.authorizations.get(principal).copied().unwrap_or(false)
    }

    pub fn set_authorized(&mut self, principal: &Principal, authorized: bool) {
        self.authorizations.insert(principal.clone(), authorized);
        tracing::info!(%principal, authorized, "authorization updated");
    }

    pub fn maintenance_mode(&self) -> bool {
        self.global.as_ref().is_some_and(|g| g.maintenance_mode)
    }

    pub fn paused(&self) -> bool {
        self.global.as_ref().is_some_and(|g| g.paused)
    }

    /// `true` while the contract is not paused.
    pub fn is_operational(&self) -> bool {
        !self.paused()
    }

    pub fn total_operations(&self) -> u64 {
        self.global.as_ref().map_or(0, |g| g.total_operations)
    }

    pub fn contract_version(&self) -> Option<u64> {
        self.global.as_ref().map(|g| g.contract_version)
    }

    /// Set maintenance mode, returning the new value.
    ///
    /// # Errors
    ///
    /// - [`ContractError::NotInitialized`] before `initialize`
    pub fn set_maintenance_mode(&mut self, enabled: bool) -> Result<bool> {
        let global = self.global_mut()?;
        global.maintenance_mode = enabled;
        tracing::info!(enabled, "maintenance mode updated");
        Ok(enabled)
    }

    /// Set the pause switch. Idempotent in both directions.
    ///
    /// # Errors
    ///
    /// - [`ContractError::NotInitialized`] before `initialize`
    pub fn set_paused(&mut self, paused: bool) -> Result<()> {
        let global = self.global_mut()?;
        global.paused = paused;
        if paused {
            tracing::warn!("contract paused");
        } else {
            tracing::info!("contract resumed");
        }
        Ok(())
    }

    /// Store the operation counter. Only the facade calls this.
    pub(crate) fn commit_operation_count(&mut self, total: u64) -> Result<()> {
        self.global_mut()?.total_operations = total;
        Ok(())
    }

    fn global_mut(&mut self) -> Result<&mut GlobalState> {
        self.global.as_mut().ok_or(ContractError::NotInitialized)
    }
}
