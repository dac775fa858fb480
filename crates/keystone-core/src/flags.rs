//! Named boolean feature flags.

use std::collections::BTreeMap;

use keystone_types::FlagName;

#[derive(Debug, Clone, Default)]
pub struct FeatureFlagStore {
    flags: BTreeMap<FlagName, bool>,
}

impl FeatureFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(flags: BTreeMap<FlagName, bool>) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> &BTreeMap<FlagName, bool> {
        &self.flags
    }

    pub fn set(&mut self, name: &FlagName, value: bool) {
        self.flags.insert(name.clone(), value);
        tracing::info!(flag = %name, value, "feature flag set");
    }

    /// Unset flags read as `false`.
    pub fn get(&self, name: &FlagName) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}
