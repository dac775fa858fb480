//! Diagnostics command handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Daemon version, chain position and effective contract constants.
pub async fn get_daemon_status(state: &Arc<DaemonState>) -> Result {
    let chain = state.chain.lock().await;
    Ok(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "height": chain.height(),
        "contracts": chain.contract_names().len(),
        "configured_contracts": state.config.chain.contracts,
        "contract_config": chain.config(),
        "event_sequence": state.event_bus.sequence(),
    }))
}

/// Signal the main loop to stop serving and remove the socket.
pub async fn shutdown(state: &Arc<DaemonState>) -> Result {
    tracing::info!("shutdown requested over RPC");
    // Err only means nothing is subscribed.
    let _ = state.shutdown_tx.send(());
    Ok(serde_json::json!({ "status": "shutting_down" }))
}
