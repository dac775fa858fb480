//! IPC command handlers.
//!
//! Each submodule implements the commands for one IPC category.

pub mod chain;
pub mod contract;
pub mod diagnostics;

use keystone_chain::{Block, TxReceipt};
use keystone_db::queries::blocks::BlockRow;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::rpc::RpcError;

/// Deserialize a params field, mapping failures to INVALID_PARAMS.
pub(crate) fn param<T: DeserializeOwned>(params: &Value, field: &str) -> Result<T, RpcError> {
    let value = params
        .get(field)
        .ok_or_else(|| RpcError::invalid_params(&format!("{field} required")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| RpcError::invalid_params(&format!("{field}: {e}")))
}

/// JSON view of a transaction receipt.
///
/// The result is `{"ok": <value>}` or `{"err": {"code", "message"}}`.
pub(crate) fn receipt_json(tx: &TxReceipt) -> Value {
    let result = match &tx.receipt.result {
        Ok(value) => serde_json::json!({ "ok": value }),
        Err(e) => serde_json::json!({ "err": { "code": e.code(), "message": e.to_string() } }),
    };
    serde_json::json!({
        "contract": tx.contract,
        "sender": tx.sender,
        "method": tx.method,
        "result": result,
        "events": tx.receipt.events,
    })
}

pub(crate) fn block_json(block: &Block) -> Value {
    serde_json::json!({
        "height": block.height,
        "hash": block.hash_hex(),
        "parent_hash": hex::encode(block.parent_hash),
        "failed_count": block.failed_count(),
        "receipts": block.receipts.iter().map(receipt_json).collect::<Vec<_>>(),
    })
}

pub(crate) fn header_json(header: &BlockRow) -> Value {
    serde_json::json!({
        "height": header.height,
        "hash": hex::encode(header.hash),
        "parent_hash": hex::encode(header.parent_hash),
        "tx_count": header.tx_count,
        "failed_count": header.failed_count,
    })
}
