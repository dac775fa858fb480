//! Chain command handlers: deployment and block production.

use std::sync::Arc;

use keystone_chain::Tx;
use serde_json::Value;
use tracing::info;

use super::{block_json, header_json, param};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Upper bound on `mine_empty_blocks` per request.
const MAX_EMPTY_BLOCKS: u64 = 10_000;

/// Deploy a new contract instance.
pub async fn deploy_contract(state: &Arc<DaemonState>, params: &Value) -> Result {
    let name: String = param(params, "name")?;
    if name.is_empty() {
        return Err(RpcError::invalid_params("name must not be empty"));
    }
    let mut chain = state.chain.lock().await;
    chain.deploy(&name)?;
    Ok(serde_json::json!({"name": name, "deployed_at": chain.height()}))
}

/// List deployed contract names.
pub async fn list_contracts(state: &Arc<DaemonState>) -> Result {
    let chain = state.chain.lock().await;
    Ok(serde_json::json!(chain.contract_names()))
}

/// Mine one block from `params.txs`.
pub async fn mine_block(state: &Arc<DaemonState>, params: &Value) -> Result {
    let txs: Vec<Tx> = param(params, "txs")?;
    let block = {
        let mut chain = state.chain.lock().await;
        chain.mine_block(txs)?
    };
    state.event_bus.emit_block(&block).await;
    info!(height = block.height, txs = block.receipts.len(), "block mined via RPC");
    Ok(block_json(&block))
}

/// Advance the chain by `params.count` empty blocks.
pub async fn mine_empty_blocks(state: &Arc<DaemonState>, params: &Value) -> Result {
    let count: u64 = param(params, "count")?;
    if count > MAX_EMPTY_BLOCKS {
        return Err(RpcError::invalid_params(&format!(
            "count must be at most {MAX_EMPTY_BLOCKS}"
        )));
    }
    let mut chain = state.chain.lock().await;
    let height = chain.mine_empty_blocks(count)?;
    Ok(serde_json::json!({"height": height}))
}

/// Current height and tip hash.
pub async fn get_chain_tip(state: &Arc<DaemonState>) -> Result {
    let chain = state.chain.lock().await;
    Ok(serde_json::json!({
        "height": chain.height(),
        "hash": hex::encode(chain.tip_hash()),
    }))
}

/// Stored block header at `params.height`.
pub async fn get_block(state: &Arc<DaemonState>, params: &Value) -> Result {
    let height: u64 = param(params, "height")?;
    let chain = state.chain.lock().await;
    let header = chain.block(height)?;
    Ok(header_json(&header))
}
