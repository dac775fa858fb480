//! # keystone-types
//!
//! Shared domain types for the Keystone registry contracts.
//!
//! Everything that crosses a crate boundary lives here: principals, the
//! per-principal records, call and value envelopes, contract events and the
//! persisted state snapshot.

pub mod analytics;
pub mod call;
pub mod events;
pub mod flag;
pub mod principal;
pub mod profile;
pub mod state;

pub use call::{CallKind, CallValue, ContractCall};
pub use flag::{FlagName, FlagNameError};
pub use principal::Principal;

/// Monotonic progression counter supplied by the execution environment.
pub type Height = u64;

/// Index of a fixed-width height period.
pub type DayBucket = u64;

/// Contract version stamped into the global state at initialization.
pub const CONTRACT_VERSION: u64 = 1;

/// Heights per day bucket (ten-minute blocks, 24 hours).
pub const DEFAULT_BLOCKS_PER_DAY: u64 = 144;

/// Reputation added on each profile activity update.
pub const DEFAULT_REPUTATION_INCREMENT: u64 = 1;

/// Maximum feature flag name length in ASCII characters.
pub const MAX_FLAG_NAME_LEN: usize = 64;
