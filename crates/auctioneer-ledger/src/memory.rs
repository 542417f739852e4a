use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::traits::BidLedger;
use auctioneer_types::AuctionError;

#[derive(Debug, Default)]
struct LedgerState {
    bids: BTreeMap<String, f64>,
    closed: bool,
}

/// In-memory bid ledger (default).
///
/// Writes take the lock exclusively, so concurrent solicitation tasks can
/// never interleave partial updates or lose one another's writes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBidLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryBidLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BidLedger for InMemoryBidLedger {
    async fn record(&self, bidder_id: &str, value: f64) -> Result<(), AuctionError> {
        let mut state = self.state.write().await;
        if state.closed {
            return Err(AuctionError::LedgerClosed);
        }
        state.bids.insert(bidder_id.to_string(), value);
        Ok(())
    }

    async fn close(&self) -> Result<BTreeMap<String, f64>, AuctionError> {
        let mut state = self.state.write().await;
        if state.closed {
            return Err(AuctionError::LedgerClosed);
        }
        state.closed = true;
        Ok(state.bids.clone())
    }
}
