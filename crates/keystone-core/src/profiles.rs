//! Per-principal profile lifecycle.

use std::collections::BTreeMap;

use keystone_types::profile::UserProfile;
use keystone_types::{Height, Principal};

use crate::{ContractError, Result};

#[derive(Debug, Clone, Default)]
pub struct UserProfileStore {
    profiles: BTreeMap<Principal, UserProfile>,
}

impl UserProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(profiles: BTreeMap<Principal, UserProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &BTreeMap<Principal, UserProfile> {
        &self.profiles
    }

    pub fn get(&self, principal: &Principal) -> Option<&UserProfile> {
        self.profiles.get(principal)
    }

    /// Create a profile for `principal` at height `now`.
    ///
    /// # Errors
    ///
    /// - [`ContractError::AlreadyExists`] if the principal already has one
    pub fn create(&mut self, principal: &Principal, now: Height) -> Result<&UserProfile> {
        if self.profiles.contains_key(principal) {
            return Err(ContractError::AlreadyExists(principal.clone()));
        }
        tracing::info!(%principal, created_at = now, "profile created");
        Ok(self
            .profiles
            .entry(principal.clone())
            .or_insert_with(|| UserProfile::new(now)))
    }

    /// Stamp `last_activity = now` and add `reputation_increment` (saturating).
    ///
    /// # Errors
    ///
    /// - [`ContractError::NotFound`] if the principal has no profile
    pub fn touch(
        &mut self,
        principal: &Principal,
        now: Height,
        reputation_increment: u64,
    ) -> Result<&UserProfile> {
        let profile = self
            .profiles
            .get_mut(principal)
            .ok_or_else(|| ContractError::NotFound(principal.clone()))?;
        profile.last_activity = now;
        profile.reputation_score = profile.reputation_score.saturating_add(reputation_increment);
        tracing::debug!(
            %principal,
            last_activity = now,
            reputation = profile.reputation_score,
            "profile activity updated"
        );
        Ok(profile)
    }
}
