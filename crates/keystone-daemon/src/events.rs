//! Contract event fan-out.
//!
//! Every event committed by a mined block is stamped with a sequence number
//! and the block height, broadcast to subscribers, and kept in a bounded
//! buffer that `get_events` pages through.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use keystone_chain::Block;
use keystone_types::events::ContractEvent;
use keystone_types::Height;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};

/// A contract event as seen by daemon clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEvent {
    /// Monotonic sequence number, starting at 1.
    pub sequence: u64,
    pub height: Height,
    pub contract: String,
    pub event: ContractEvent,
}

/// Event bus for broadcasting events to subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChainEvent>,
    sequence: Arc<AtomicU64>,
    recent: Arc<Mutex<VecDeque<ChainEvent>>>,
    capacity: usize,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            sequence: Arc::new(AtomicU64::new(0)),
            recent: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Emit every event of a mined block, in receipt order.
    pub async fn emit_block(&self, block: &Block) {
        let mut recent = self.recent.lock().await;
        for tx in &block.receipts {
            for event in &tx.receipt.events {
                let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
                let event = ChainEvent {
                    sequence,
                    height: block.height,
                    contract: tx.contract.clone(),
                    event: event.clone(),
                };
                if recent.len() == self.capacity {
                    recent.pop_front();
                }
                recent.push_back(event.clone());
                // Ignore send errors (no subscribers)
                let _ = self.sender.send(event);
            }
        }
    }

    /// Subscribe to events. Returns a receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<ChainEvent> {
        self.sender.subscribe()
    }

    /// Buffered events with a sequence number greater than `after`.
    pub async fn since(&self, after: u64, contract: Option<&str>) -> Vec<ChainEvent> {
        self.recent
            .lock()
            .await
            .iter()
            .filter(|e| e.sequence > after)
            .filter(|e| contract.map_or(true, |c| e.contract == c))
            .cloned()
            .collect()
    }

    /// Get the current sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystone_chain::Chain;
    use keystone_core::ContractConfig;
    use keystone_types::ContractCall;

    fn mined_block() -> Block {
        let mut chain = Chain::new(ContractConfig::default()).expect("chain");
        chain.deploy("registry").expect("deploy");
        chain
            .mine_block(vec![
                keystone_chain::Tx::new("registry", "ST1", ContractCall::Initialize),
                keystone_chain::Tx::new("registry", "ST2", ContractCall::EmergencyPause),
                keystone_chain::Tx::new("registry", "ST1", ContractCall::EmergencyPause),
            ])
            .expect("mine")
    }

    #[tokio::test]
    async fn test_emit_block_sequences_events() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        bus.emit_block(&mined_block()).await;

        // Failed call emits nothing.
        assert_eq!(bus.sequence(), 2);
        let first = rx.recv().await.expect("event");
        assert_eq!(first.sequence, 1);
        assert!(matches!(first.event, ContractEvent::Initialized { .. }));
        assert_eq!(bus.since(1, None).await.len(), 1);
        assert!(bus.since(0, Some("other")).await.is_empty());
    }

    #[tokio::test]
    async fn test_buffer_is_bounded() {
        let bus = EventBus::new(1);
        bus.emit_block(&mined_block()).await;
        let recent = bus.since(0, None).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].sequence, 2);
        assert_eq!(recent[0].event, ContractEvent::Paused);
    }
}
