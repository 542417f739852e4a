use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use auctioneer_registry::BidderRegistry;
use auctioneer_round::RoundDispatcher;
use auctioneer_types::Result;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<BidderRegistry>,
    pub dispatcher: Arc<RoundDispatcher>,
    /// Rounds completed over the process lifetime, for the per-round log line.
    pub rounds_completed: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(solicit_timeout: Duration) -> Result<Self> {
        Ok(Self {
            registry: Arc::new(BidderRegistry::new()),
            dispatcher: Arc::new(RoundDispatcher::new(solicit_timeout)?),
            rounds_completed: Arc::new(AtomicU64::new(0)),
        })
    }
}
