//! Transactions, receipts and blocks.

use keystone_core::Receipt;
use keystone_db::queries::blocks::BlockRow;
use keystone_types::{ContractCall, Height, Principal};
use serde::{Deserialize, Serialize};

/// Parent hash of the first block.
pub const GENESIS_HASH: [u8; 32] = [0u8; 32];

/// Domain separator mixed into every block hash.
const BLOCK_HASH_CONTEXT: &[u8] = b"keystone-block-v1";

/// A call submitted to a named contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub contract: String,
    pub sender: Principal,
    pub call: ContractCall,
}

impl Tx {
    pub fn new(contract: impl Into<String>, sender: impl Into<Principal>, call: ContractCall) -> Self {
        Self {
            contract: contract.into(),
            sender: sender.into(),
            call,
        }
    }
}

/// Outcome of one transaction within a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub contract: String,
    pub sender: Principal,
    pub method: &'static str,
    pub receipt: Receipt,
}

/// A mined batch of transactions sharing one height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub height: Height,
    pub hash: [u8; 32],
    pub parent_hash: [u8; 32],
    /// One receipt per submitted transaction, in submission order.
    pub receipts: Vec<TxReceipt>,
}

impl Block {
    /// Number of transactions whose call was rejected.
    pub fn failed_count(&self) -> usize {
        self.receipts.iter().filter(|r| !r.receipt.is_ok()).count()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// The persisted header for this block.
    pub fn header(&self) -> BlockRow {
        BlockRow {
            height: self.height,
            hash: self.hash,
            parent_hash: self.parent_hash,
            tx_count: self.receipts.len() as u32,
            failed_count: self.failed_count() as u32,
        }
    }
}

/// BLAKE3 over the parent hash, the height and each transaction's JSON.
pub fn compute_hash(
    parent_hash: &[u8; 32],
    height: Height,
    txs: &[Tx],
) -> serde_json::Result<[u8; 32]> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(BLOCK_HASH_CONTEXT);
    hasher.update(parent_hash);
    hasher.update(&height.to_le_bytes());
    hasher.update(&(txs.len() as u64).to_le_bytes());
    for tx in txs {
        let encoded = serde_json::to_vec(tx)?;
        hasher.update(&(encoded.len() as u64).to_le_bytes());
        hasher.update(&encoded);
    }
    Ok(*hasher.finalize().as_bytes())
}
