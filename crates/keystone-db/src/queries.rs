//! Database query functions organized by domain.
//!
//! Every function takes the contract name; rows of different contract
//! instances never mix.

pub mod access;
pub mod analytics;
pub mod blocks;
pub mod contracts;
pub mod flags;
pub mod profiles;
