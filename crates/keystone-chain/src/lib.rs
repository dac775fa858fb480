//! # keystone-chain
//!
//! Deterministic execution environment for keystone contracts.
//!
//! A [`Chain`] hosts any number of named contract instances, each with its
//! own independent state. Transactions are submitted in batches; each batch
//! becomes one [`Block`] that advances the height by exactly one, and every
//! transaction in it executes in submission order at that height.
//!
//! All state lives in SQLite. A block header and the post-block state of the
//! contracts it touched are committed in one transaction.

pub mod block;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use keystone_core::{CallContext, Contract, ContractConfig, ContractError};
use keystone_db::queries::blocks::{self, BlockRow};
use keystone_db::queries::contracts;
use keystone_db::{snapshot, DbError};
use keystone_types::{CallValue, ContractCall, Height, Principal};
use rusqlite::Connection;

pub use block::{Block, Tx, TxReceipt, GENESIS_HASH};

/// Execution environment errors.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("unknown contract: {0}")]
    UnknownContract(String),

    #[error("contract already deployed: {0}")]
    ContractExists(String),

    #[error("contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("storage error: {0}")]
    Db(#[from] DbError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChainError>;

/// The execution environment.
pub struct Chain {
    conn: Connection,
    config: ContractConfig,
    height: Height,
    tip_hash: [u8; 32],
    contracts: BTreeMap<String, Contract>,
}

impl Chain {
    /// A fresh chain backed by an in-memory database.
    pub fn new(config: ContractConfig) -> Result<Self> {
        config.validate()?;
        let conn = keystone_db::open_memory()?;
        Ok(Self {
            conn,
            config,
            height: 0,
            tip_hash: GENESIS_HASH,
            contracts: BTreeMap::new(),
        })
    }

    /// Open (or create) a chain stored at `path`, restoring every deployed
    /// contract and the chain tip.
    pub fn open(path: &Path, config: ContractConfig) -> Result<Self> {
        config.validate()?;
        let conn = keystone_db::open(path)?;

        let mut restored = BTreeMap::new();
        for row in contracts::list(&conn)? {
            let state = snapshot::load(&conn, &row.name)?;
            restored.insert(row.name, Contract::restore(config.clone(), state)?);
        }

        let (height, tip_hash) = match blocks::tip(&conn)? {
            Some(tip) => (tip.height, tip.hash),
            None => (0, GENESIS_HASH),
        };

        tracing::info!(
            path = %path.display(),
            height,
            contracts = restored.len(),
            "chain opened"
        );

        Ok(Self {
            conn,
            config,
            height,
            tip_hash,
            contracts: restored,
        })
    }

    /// Current tip height. Zero before the first block.
    pub fn height(&self) -> Height {
        self.height
    }

    /// Hash of the tip block, [`GENESIS_HASH`] before the first block.
    pub fn tip_hash(&self) -> [u8; 32] {
        self.tip_hash
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Deploy a fresh, uninitialized contract instance under `name`.
    pub fn deploy(&mut self, name: &str) -> Result<()> {
        if self.contracts.contains_key(name) {
            return Err(ChainError::ContractExists(name.to_string()));
        }
        let contract = Contract::new(self.config.clone())?;
        contracts::insert(&self.conn, name, self.height)?;
        self.contracts.insert(name.to_string(), contract);
        tracing::info!(contract = name, height = self.height, "contract deployed");
        Ok(())
    }

    pub fn contract(&self, name: &str) -> Option<&Contract> {
        self.contracts.get(name)
    }

    /// Deployed contract names in name order.
    pub fn contract_names(&self) -> Vec<String> {
        self.contracts.keys().cloned().collect()
    }

    /// Mine one block containing `txs`.
    ///
    /// Every transaction must target a deployed contract; otherwise nothing
    /// executes and the height does not move. Individual call failures are
    /// recorded in their receipts and do not abort the block.
    ///
    /// Calls run against working copies of the targeted contracts. The copies
    /// replace the live instances only after the block has been persisted, so
    /// a storage failure leaves both memory and disk at the previous tip.
    pub fn mine_block(&mut self, txs: Vec<Tx>) -> Result<Block> {
        let mut working: BTreeMap<String, Contract> = BTreeMap::new();
        for tx in &txs {
            if working.contains_key(&tx.contract) {
                continue;
            }
            let contract = self
                .contracts
                .get(&tx.contract)
                .ok_or_else(|| ChainError::UnknownContract(tx.contract.clone()))?;
            working.insert(tx.contract.clone(), contract.clone());
        }

        let height = self.height + 1;
        let parent_hash = self.tip_hash;
        let hash = block::compute_hash(&parent_hash, height, &txs)?;

        let mut receipts = Vec::with_capacity(txs.len());
        let mut touched = BTreeSet::new();
        for tx in txs {
            let Some(contract) = working.get_mut(&tx.contract) else {
                return Err(ChainError::UnknownContract(tx.contract));
            };
            let ctx = CallContext::new(tx.sender.clone(), height);
            let receipt = contract.execute(&ctx, &tx.call);
            if receipt.is_ok() && !tx.call.is_read_only() {
                touched.insert(tx.contract.clone());
            }
            receipts.push(TxReceipt {
                contract: tx.contract,
                sender: tx.sender,
                method: tx.call.method(),
                receipt,
            });
        }

        let block = Block {
            height,
            hash,
            parent_hash,
            receipts,
        };

        let snapshots: Vec<(String, _)> = touched
            .iter()
            .filter_map(|name| working.get(name).map(|c| (name.clone(), c.snapshot())))
            .collect();
        let refs: Vec<(&str, &_)> = snapshots.iter().map(|(n, s)| (n.as_str(), s)).collect();
        if let Err(err) = snapshot::persist_block(&self.conn, &block.header(), &refs) {
            tracing::error!(height, error = %err, "block persist failed, state unchanged");
            return Err(err.into());
        }

        for name in touched {
            if let Some(contract) = working.remove(&name) {
                self.contracts.insert(name, contract);
            }
        }
        self.height = height;
        self.tip_hash = hash;

        tracing::info!(
            height,
            hash = %hex::encode(&hash[..8]),
            txs = block.receipts.len(),
            failed = block.failed_count(),
            "block mined"
        );
        Ok(block)
    }

    /// Advance the height by `count` blocks without transactions.
    pub fn mine_empty_blocks(&mut self, count: u64) -> Result<Height> {
        for _ in 0..count {
            self.mine_block(Vec::new())?;
        }
        Ok(self.height)
    }

    /// Evaluate a read-only call against `contract` at the tip height.
    pub fn call_read_only(
        &self,
        contract: &str,
        sender: &Principal,
        call: &ContractCall,
    ) -> Result<CallValue> {
        let instance = self
            .contracts
            .get(contract)
            .ok_or_else(|| ChainError::UnknownContract(contract.to_string()))?;
        let ctx = CallContext::new(sender.clone(), self.height);
        tracing::debug!(contract, method = call.method(), "read-only call");
        Ok(instance.read(&ctx, call)?)
    }

    /// Stored header at `height`.
    pub fn block(&self, height: Height) -> Result<BlockRow> {
        Ok(blocks::get(&self.conn, height)?)
    }
}
