//! Contract constants.
//!
//! Loaded as the `[contract]` section of the daemon configuration; every
//! field has a default so an empty section is valid.

use keystone_types::{
    DayBucket, Height, CONTRACT_VERSION, DEFAULT_BLOCKS_PER_DAY, DEFAULT_REPUTATION_INCREMENT,
};
use serde::{Deserialize, Serialize};

use crate::{ContractError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Heights per day bucket. Must be at least 1.
    #[serde(default = "default_blocks_per_day")]
    pub blocks_per_day: u64,
    /// Version stamped into the global state by `initialize`.
    #[serde(default = "default_contract_version")]
    pub contract_version: u64,
    /// Reputation added per `update-user-activity`.
    #[serde(default = "default_reputation_increment")]
    pub reputation_increment: u64,
}

fn default_blocks_per_day() -> u64 {
    DEFAULT_BLOCKS_PER_DAY
}

fn default_contract_version() -> u64 {
    CONTRACT_VERSION
}

fn default_reputation_increment() -> u64 {
    DEFAULT_REPUTATION_INCREMENT
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            blocks_per_day: default_blocks_per_day(),
            contract_version: default_contract_version(),
            reputation_increment: default_reputation_increment(),
        }
    }
}

impl ContractConfig {
    /// Configuration with one height per day bucket.
    ///
    /// Every new block starts a new day, which is how a local test chain
    /// advances streaks.
    pub fn per_block_days() -> Self {
        Self {
            blocks_per_day: 1,
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// - [`ContractError::InvalidParams`] if `blocks_per_day` is zero
    pub fn validate(&self) -> Result<()> {
        if self.blocks_per_day == 0 {
            return Err(ContractError::InvalidParams(
                "blocks_per_day must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Day bucket containing `height`.
    pub fn day_bucket(&self, height: Height) -> DayBucket {
        crate::analytics::day_bucket(height, self.blocks_per_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContractConfig::default();
        assert_eq!(config.blocks_per_day, 144);
        assert_eq!(config.contract_version, 1);
        assert_eq!(config.reputation_increment, 1);
        config.validate().expect("default is valid");
    }

    #[test]
    fn test_zero_width_rejected() {
        let config = ContractConfig {
            blocks_per_day: 0,
            ..ContractConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ContractError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_empty_section_uses_defaults() {
        let config: ContractConfig = toml::from_str("").expect("parse");
        assert_eq!(config, ContractConfig::default());

        let config: ContractConfig = toml::from_str("blocks_per_day = 10").expect("parse");
        assert_eq!(config.blocks_per_day, 10);
        assert_eq!(config.day_bucket(25), 2);
    }
}
