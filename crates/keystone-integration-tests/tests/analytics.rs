//! Integration test: activity analytics across blocks.
//!
//! Exercises:
//! 1. Activity recording and the analytics summary shape
//! 2. Streaks built over consecutive day buckets, and reset by a gap
//! 3. Daily active membership: distinct principals, idempotence, reset
//! 4. Reset leaves streaks and the operation counter alone
//!
//! Streak scenarios run with one height per day bucket, so every block is a
//! new day; daily-active scenarios use the default width so consecutive
//! blocks share a day.

use keystone_core::ContractConfig;
use keystone_integration_tests::*;
use keystone_types::{CallValue, ContractCall};

fn setup(config: ContractConfig) -> keystone_chain::Chain {
    let mut chain = registry_chain(config).expect("chain");
    let block = chain
        .mine_block(vec![
            tx(LAND_REGISTRY, DEPLOYER, ContractCall::Initialize),
            authorize(LAND_REGISTRY, WALLET_1),
        ])
        .expect("setup block");
    assert_eq!(block.receipts.len(), 2);
    assert!(all_ok_true(&block));
    chain
}

fn read(chain: &keystone_chain::Chain, call: ContractCall) -> CallValue {
    chain
        .call_read_only(LAND_REGISTRY, &principal(DEPLOYER), &call)
        .expect("read-only call")
}

fn streak(chain: &keystone_chain::Chain, user: &str) -> Option<u64> {
    read(
        chain,
        ContractCall::GetUserActivityStreak {
            principal: principal(user),
        },
    )
    .as_uint()
}

fn daily_active(chain: &keystone_chain::Chain) -> Option<u64> {
    read(chain, ContractCall::GetDailyActiveUsers).as_uint()
}

#[test]
fn activity_tracking_populates_summary() {
    let mut chain = setup(ContractConfig::default());

    let activity = chain
        .mine_block(vec![record_activity(LAND_REGISTRY, WALLET_1)])
        .expect("activity block");
    assert_eq!(ok_value(&activity, 0), Some(&CallValue::Bool(true)));

    // Summary requested inside a block, like any other call.
    let summary_block = chain
        .mine_block(vec![tx(
            LAND_REGISTRY,
            DEPLOYER,
            ContractCall::GetAnalyticsSummary,
        )])
        .expect("summary block");
    let summary = ok_value(&summary_block, 0)
        .and_then(CallValue::as_summary)
        .expect("summary tuple");
    assert_eq!(summary.daily_active_users, 1);
    assert_eq!(summary.total_operations, 2);
    assert_eq!(summary.contract_version, 1);
    assert!(!summary.maintenance_mode);
    assert_eq!(summary.current_block, 3);

    let json = serde_json::to_value(summary).expect("serialize");
    for key in [
        "daily-active-users",
        "total-operations",
        "contract-version",
        "maintenance-mode",
        "current-block",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn streak_grows_one_per_day() {
    let mut chain = setup(ContractConfig::per_block_days());

    for expected in 1..=3 {
        let block = chain
            .mine_block(vec![record_activity(LAND_REGISTRY, WALLET_1)])
            .expect("activity block");
        assert_eq!(ok_value(&block, 0), Some(&CallValue::Bool(true)));
        assert_eq!(streak(&chain, WALLET_1), Some(expected));
    }

    // Read via a mined call as well.
    let streak_block = chain
        .mine_block(vec![tx(
            LAND_REGISTRY,
            DEPLOYER,
            ContractCall::GetUserActivityStreak {
                principal: principal(WALLET_1),
            },
        )])
        .expect("streak block");
    assert_eq!(ok_value(&streak_block, 0), Some(&CallValue::Uint(3)));
}

#[test]
fn streak_unchanged_within_day_and_reset_after_gap() {
    let mut chain = setup(ContractConfig::per_block_days());

    chain
        .mine_block(vec![
            record_activity(LAND_REGISTRY, WALLET_1),
            record_activity(LAND_REGISTRY, WALLET_1),
        ])
        .expect("same-day block");
    assert_eq!(streak(&chain, WALLET_1), Some(1));

    chain
        .mine_block(vec![record_activity(LAND_REGISTRY, WALLET_1)])
        .expect("next day");
    assert_eq!(streak(&chain, WALLET_1), Some(2));

    chain.mine_empty_blocks(2).expect("gap");
    chain
        .mine_block(vec![record_activity(LAND_REGISTRY, WALLET_1)])
        .expect("after gap");
    assert_eq!(streak(&chain, WALLET_1), Some(1));
}

#[test]
fn streak_defaults_to_zero() {
    let chain = setup(ContractConfig::per_block_days());
    assert_eq!(streak(&chain, WALLET_2), Some(0));
}

#[test]
fn daily_stats_reset_clears_membership_only() {
    let mut chain = setup(ContractConfig::default());

    let activity = chain
        .mine_block(vec![record_activity(LAND_REGISTRY, WALLET_1)])
        .expect("activity block");
    assert_eq!(ok_value(&activity, 0), Some(&CallValue::Bool(true)));
    assert!(daily_active(&chain).expect("uint") >= 1);

    let before = read(&chain, ContractCall::GetAnalyticsSummary);
    let ops_before = before.as_summary().map(|s| s.total_operations);
    let streak_before = streak(&chain, WALLET_1);

    let reset = chain
        .mine_block(vec![tx(LAND_REGISTRY, DEPLOYER, ContractCall::ResetDailyStats)])
        .expect("reset block");
    assert_eq!(ok_value(&reset, 0), Some(&CallValue::Bool(true)));

    assert_eq!(daily_active(&chain), Some(0));
    assert_eq!(streak(&chain, WALLET_1), streak_before);
    let after = read(&chain, ContractCall::GetAnalyticsSummary);
    assert_eq!(after.as_summary().map(|s| s.total_operations), ops_before);
}

#[test]
fn reset_requires_owner() {
    let mut chain = setup(ContractConfig::default());
    chain
        .mine_block(vec![record_activity(LAND_REGISTRY, WALLET_1)])
        .expect("activity block");
    let reset = chain
        .mine_block(vec![tx(LAND_REGISTRY, WALLET_1, ContractCall::ResetDailyStats)])
        .expect("reset block");
    assert_eq!(err_code(&reset, 0), Some(104));
    assert_eq!(daily_active(&chain), Some(1));
}

#[test]
fn daily_active_counts_distinct_principals() {
    let mut chain = setup(ContractConfig::default());
    chain
        .mine_block(vec![authorize(LAND_REGISTRY, WALLET_2)])
        .expect("authorize");

    chain
        .mine_block(vec![
            record_activity(LAND_REGISTRY, WALLET_1),
            record_activity(LAND_REGISTRY, WALLET_2),
        ])
        .expect("two users");
    assert_eq!(daily_active(&chain), Some(2));

    chain
        .mine_block(vec![
            record_activity(LAND_REGISTRY, WALLET_1),
            record_activity(LAND_REGISTRY, WALLET_1),
        ])
        .expect("same user again");
    assert_eq!(daily_active(&chain), Some(2));
}

#[test]
fn same_principal_twice_is_one_active_user() {
    let mut chain = setup(ContractConfig::default());
    chain
        .mine_block(vec![
            record_activity(LAND_REGISTRY, WALLET_1),
            record_activity(LAND_REGISTRY, WALLET_1),
        ])
        .expect("activity block");
    assert_eq!(daily_active(&chain), Some(1));
}

#[test]
fn new_day_starts_empty() {
    let mut chain = setup(ContractConfig::per_block_days());
    chain
        .mine_block(vec![record_activity(LAND_REGISTRY, WALLET_1)])
        .expect("activity block");
    assert_eq!(daily_active(&chain), Some(1));
    chain.mine_empty_blocks(1).expect("next day");
    assert_eq!(daily_active(&chain), Some(0));
}
