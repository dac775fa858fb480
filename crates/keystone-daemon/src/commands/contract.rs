//! Contract command handlers: read-only evaluation and events.

use std::sync::Arc;

use keystone_types::{ContractCall, Principal};
use serde_json::Value;

use super::param;
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Evaluate a read-only call at the chain tip.
pub async fn call_read_only(state: &Arc<DaemonState>, params: &Value) -> Result {
    let contract: String = param(params, "contract")?;
    let sender: Principal = param(params, "sender")?;
    let call: ContractCall = param(params, "call")?;
    if !call.is_read_only() {
        return Err(RpcError::invalid_params(&format!(
            "{} is not a read-only call",
            call.method()
        )));
    }
    let chain = state.chain.lock().await;
    let value = chain.call_read_only(&contract, &sender, &call)?;
    Ok(serde_json::json!(value))
}

/// Analytics summary of `params.contract` at the chain tip.
pub async fn get_analytics_summary(state: &Arc<DaemonState>, params: &Value) -> Result {
    let contract: String = param(params, "contract")?;
    let chain = state.chain.lock().await;
    let instance = chain
        .contract(&contract)
        .ok_or_else(|| RpcError::unknown_contract(&contract))?;
    Ok(serde_json::json!(instance.summary(chain.height())))
}

/// Buffered contract events after `params.after` (default 0), optionally
/// restricted to `params.contract`.
pub async fn get_events(state: &Arc<DaemonState>, params: &Value) -> Result {
    let after = params.get("after").and_then(|v| v.as_u64()).unwrap_or(0);
    let contract = params.get("contract").and_then(|v| v.as_str());
    let events = state.event_bus.since(after, contract).await;
    Ok(serde_json::json!({
        "sequence": state.event_bus.sequence(),
        "events": events,
    }))
}
