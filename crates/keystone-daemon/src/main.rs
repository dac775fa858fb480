//! keystone-daemon: hosts a keystone chain behind JSON-RPC.
//!
//! Single OS process running a Tokio async runtime. Clients talk to the
//! daemon with newline-delimited JSON-RPC 2.0 over a Unix socket in the data
//! directory.

mod commands;
mod config;
mod events;
mod rpc;

use std::sync::Arc;

use keystone_chain::Chain;
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::config::DaemonConfig;
use crate::events::EventBus;
use crate::rpc::RpcServer;

/// Daemon-wide shared state.
pub struct DaemonState {
    /// The chain. One call at a time.
    pub chain: Arc<tokio::sync::Mutex<Chain>>,
    /// Configuration.
    pub config: DaemonConfig,
    /// Event bus for contract events of mined blocks.
    pub event_bus: EventBus,
    /// Shutdown signal sender.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl DaemonState {
    pub fn new(chain: Chain, config: DaemonConfig) -> Self {
        let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);
        let event_bus = EventBus::new(config.advanced.event_buffer);
        Self {
            chain: Arc::new(tokio::sync::Mutex::new(chain)),
            config,
            event_bus,
            shutdown_tx,
        }
    }
}

/// Deploy every configured contract that is not yet on the chain.
fn deploy_configured(chain: &mut Chain, config: &DaemonConfig) -> anyhow::Result<()> {
    for name in &config.chain.contracts {
        if chain.contract(name).is_none() {
            chain.deploy(name)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = DaemonConfig::load()?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::try_new(format!(
            "keystone={}",
            config.advanced.log_level
        ))?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Keystone daemon starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    // 2. Open chain
    let db_path = config.db_path();
    let mut chain = Chain::open(&db_path, config.contract.clone())?;
    deploy_configured(&mut chain, &config)?;
    info!(
        height = chain.height(),
        contracts = ?chain.contract_names(),
        "chain ready"
    );

    // 3. Build daemon state
    let state = Arc::new(DaemonState::new(chain, config));

    // 4. Start IPC server
    let socket_path = data_dir.join("daemon.sock");
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());

    // 5. Run the RPC server until shutdown
    let mut shutdown_rx = state.shutdown_tx.subscribe();
    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = shutdown_rx.recv() => {
            info!("Shutdown signal received");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    // Clean up socket file
    let _ = std::fs::remove_file(&socket_path);

    info!("Daemon stopped");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use keystone_core::ContractConfig;

    pub const DEPLOYER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
    pub const WALLET_1: &str = "ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5";

    /// In-memory chain with one contract named `registry`.
    pub fn test_state() -> Arc<DaemonState> {
        let config = DaemonConfig {
            contract: ContractConfig::per_block_days(),
            chain: config::ChainConfig {
                contracts: vec!["registry".to_string()],
            },
            ..DaemonConfig::default()
        };
        let mut chain = Chain::new(config.contract.clone()).expect("chain");
        deploy_configured(&mut chain, &config).expect("deploy");
        Arc::new(DaemonState::new(chain, config))
    }

    #[test]
    fn test_deploy_configured_is_idempotent() {
        let config = DaemonConfig::default();
        let mut chain = Chain::new(config.contract.clone()).expect("chain");
        deploy_configured(&mut chain, &config).expect("first");
        deploy_configured(&mut chain, &config).expect("second");
        assert_eq!(
            chain.contract_names(),
            vec!["metaverse-rental-manager", "virtual-land-registry"]
        );
    }
}
