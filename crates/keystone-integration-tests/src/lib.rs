//! Integration test crate for keystone.
//!
//! Shared fixtures for the end-to-end scenarios in `tests/`: a chain with
//! the two registry contracts deployed, well-known test accounts, and
//! small helpers for building transactions and reading receipts.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p keystone-integration-tests
//! ```

use keystone_chain::{Block, Chain, Tx};
use keystone_core::ContractConfig;
use keystone_types::{CallValue, ContractCall, FlagName, Principal};

/// Contract deployer and owner in every scenario.
pub const DEPLOYER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
pub const WALLET_1: &str = "ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5";
pub const WALLET_2: &str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";
pub const WALLET_3: &str = "ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC";

pub const LAND_REGISTRY: &str = "virtual-land-registry";
pub const RENTAL_MANAGER: &str = "metaverse-rental-manager";

/// A chain hosting both registry contracts.
pub fn registry_chain(config: ContractConfig) -> Result<Chain, keystone_chain::ChainError> {
    let mut chain = Chain::new(config)?;
    chain.deploy(LAND_REGISTRY)?;
    chain.deploy(RENTAL_MANAGER)?;
    Ok(chain)
}

pub fn principal(address: &str) -> Principal {
    Principal::from(address)
}

/// A call against `contract` sent by `sender`.
pub fn tx(contract: &str, sender: &str, call: ContractCall) -> Tx {
    Tx::new(contract, sender, call)
}

pub fn authorize(contract: &str, user: &str) -> Tx {
    tx(
        contract,
        DEPLOYER,
        ContractCall::AuthorizeUser {
            principal: principal(user),
        },
    )
}

/// `record-user-activity(user)` sent by the deployer.
pub fn record_activity(contract: &str, user: &str) -> Tx {
    tx(
        contract,
        DEPLOYER,
        ContractCall::RecordUserActivity {
            principal: principal(user),
        },
    )
}

pub fn flag(name: &str) -> Option<FlagName> {
    FlagName::new(name).ok()
}

/// Successful value of receipt `index` in `block`.
pub fn ok_value(block: &Block, index: usize) -> Option<&CallValue> {
    block
        .receipts
        .get(index)
        .and_then(|r| r.receipt.result.as_ref().ok())
}

/// Error code of receipt `index` in `block`.
pub fn err_code(block: &Block, index: usize) -> Option<u32> {
    block
        .receipts
        .get(index)
        .and_then(|r| r.receipt.error_code())
}

/// Every receipt in `block` is `ok(true)`.
pub fn all_ok_true(block: &Block) -> bool {
    block
        .receipts
        .iter()
        .all(|r| matches!(r.receipt.result, Ok(CallValue::Bool(true))))
}
