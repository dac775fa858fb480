//! SQL schema definitions.

/// Complete schema for the v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Deployed contract instances
-- ============================================================

CREATE TABLE IF NOT EXISTS contracts (
    name TEXT PRIMARY KEY,
    deployed_at INTEGER NOT NULL
);

-- ============================================================
-- Access control
-- ============================================================

CREATE TABLE IF NOT EXISTS global_state (
    contract TEXT PRIMARY KEY REFERENCES contracts(name) ON DELETE CASCADE,
    owner TEXT NOT NULL,
    initialized INTEGER NOT NULL DEFAULT 0,
    maintenance_mode INTEGER NOT NULL DEFAULT 0,
    paused INTEGER NOT NULL DEFAULT 0,
    total_operations INTEGER NOT NULL DEFAULT 0,
    contract_version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS authorizations (
    contract TEXT NOT NULL REFERENCES contracts(name) ON DELETE CASCADE,
    principal TEXT NOT NULL,
    authorized INTEGER NOT NULL,
    PRIMARY KEY (contract, principal)
);

-- ============================================================
-- Profiles
-- ============================================================

CREATE TABLE IF NOT EXISTS user_profiles (
    contract TEXT NOT NULL REFERENCES contracts(name) ON DELETE CASCADE,
    principal TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    last_activity INTEGER NOT NULL,
    reputation_score INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (contract, principal)
);

-- ============================================================
-- Activity analytics
-- ============================================================

CREATE TABLE IF NOT EXISTS activity_streaks (
    contract TEXT NOT NULL REFERENCES contracts(name) ON DELETE CASCADE,
    principal TEXT NOT NULL,
    current_streak INTEGER NOT NULL,
    last_activity_day INTEGER NOT NULL,
    PRIMARY KEY (contract, principal)
);

CREATE TABLE IF NOT EXISTS daily_active_users (
    contract TEXT NOT NULL REFERENCES contracts(name) ON DELETE CASCADE,
    day_bucket INTEGER NOT NULL,
    principal TEXT NOT NULL,
    PRIMARY KEY (contract, day_bucket, principal)
);

CREATE INDEX IF NOT EXISTS idx_daily_active_day ON daily_active_users(contract, day_bucket);

-- ============================================================
-- Feature flags
-- ============================================================

CREATE TABLE IF NOT EXISTS feature_flags (
    contract TEXT NOT NULL REFERENCES contracts(name) ON DELETE CASCADE,
    name TEXT NOT NULL,
    enabled INTEGER NOT NULL,
    PRIMARY KEY (contract, name)
);

-- ============================================================
-- Chain
-- ============================================================

CREATE TABLE IF NOT EXISTS blocks (
    height INTEGER PRIMARY KEY,
    hash BLOB NOT NULL UNIQUE,
    parent_hash BLOB NOT NULL,
    tx_count INTEGER NOT NULL,
    failed_count INTEGER NOT NULL DEFAULT 0
);
"#;
