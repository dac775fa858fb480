//! # keystone-core
//!
//! Access-control and activity-analytics state machine shared by the
//! registry contracts.
//!
//! Every call enters through [`contract::Contract`], which runs the guard
//! pipeline, delegates to exactly one store and returns a
//! [`contract::Receipt`]. Time comes only from the height in the
//! [`contract::CallContext`].
//!
//! ## Modules
//!
//! - [`access`] — Owner, authorization set, maintenance and pause switches
//! - [`profiles`] — Per-principal profile lifecycle
//! - [`analytics`] — Day bucketing, streaks, daily active sets
//! - [`flags`] — Named boolean feature flags
//! - [`guard`] — Ordered per-call guard pipeline
//! - [`contract`] — The call facade
//! - [`config`] — Contract constants

pub mod access;
pub mod analytics;
pub mod config;
pub mod contract;
pub mod flags;
pub mod guard;
pub mod profiles;

pub use config::ContractConfig;
pub use contract::{CallContext, Contract, Receipt};

use keystone_types::Principal;

/// Error code for invalid parameters, also used for maintenance rejections.
pub const ERR_INVALID_PARAMS: u32 = 101;

/// Errors a contract call can fail with.
///
/// Each variant maps to a stable numeric code via [`ContractError::code`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// The principal is not in the authorization set.
    #[error("principal {0} is not authorized")]
    NotAuthorized(Principal),

    /// Malformed call arguments or configuration.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// The call is blocked while maintenance mode is on.
    #[error("maintenance mode is active")]
    MaintenanceActive,

    /// No profile exists for the principal.
    #[error("no profile found for {0}")]
    NotFound(Principal),

    /// A profile already exists for the principal.
    #[error("profile already exists for {0}")]
    AlreadyExists(Principal),

    /// The caller is not the contract owner.
    #[error("caller {0} is not the contract owner")]
    NotOwner(Principal),

    /// The contract is paused.
    #[error("contract is paused")]
    Paused,

    /// `initialize` has already run.
    #[error("contract is already initialized")]
    AlreadyInitialized,

    /// `initialize` has not run yet.
    #[error("contract is not initialized")]
    NotInitialized,

    /// The operation counter cannot be incremented further.
    #[error("operation counter overflow")]
    Overflow,
}

/// Broad class of a [`ContractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller is not owner, or not authorized.
    Authorization,
    /// Initialization, maintenance, pause or counter state forbids the call.
    StateGuard,
    /// Arguments failed validation.
    Validation,
    /// A required record does not exist.
    NotFound,
    /// A record that must be unique already exists.
    AlreadyExists,
}

impl ContractError {
    /// Numeric error code returned on the call surface.
    pub fn code(&self) -> u32 {
        match self {
            Self::NotAuthorized(_) => 100,
            Self::InvalidParams(_) | Self::MaintenanceActive => ERR_INVALID_PARAMS,
            Self::NotFound(_) => 102,
            Self::AlreadyExists(_) => 103,
            Self::NotOwner(_) => 104,
            Self::Paused => 105,
            Self::AlreadyInitialized => 106,
            Self::NotInitialized => 107,
            Self::Overflow => 108,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotAuthorized(_) | Self::NotOwner(_) => ErrorCategory::Authorization,
            Self::MaintenanceActive
            | Self::Paused
            | Self::AlreadyInitialized
            | Self::NotInitialized
            | Self::Overflow => ErrorCategory::StateGuard,
            Self::InvalidParams(_) => ErrorCategory::Validation,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::AlreadyExists(_) => ErrorCategory::AlreadyExists,
        }
    }
}

/// Convenience result type for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;
