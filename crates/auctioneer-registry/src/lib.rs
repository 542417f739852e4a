use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use auctioneer_types::{AuctionError, BidderEndpoint, Result};

/// Process-wide bidder directory, shared by registration handlers and round
/// dispatch. Reads (snapshots, list queries) run concurrently with writes
/// without blocking each other.
///
/// A duplicate id is rejected rather than overwritten: the first
/// registration holds the id for the process lifetime. A bidder registered
/// while a round is in flight is simply not part of that round's snapshot;
/// it participates from the next round on.
#[derive(Debug, Default)]
pub struct BidderRegistry {
    bidders: DashMap<String, BidderEndpoint>,
}

impl BidderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bidder endpoint. Fails if the id is already taken.
    pub fn register(&self, endpoint: BidderEndpoint) -> Result<()> {
        match self.bidders.entry(endpoint.id.clone()) {
            Entry::Occupied(_) => Err(AuctionError::BidderAlreadyRegistered(endpoint.id)),
            Entry::Vacant(slot) => {
                slot.insert(endpoint);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<BidderEndpoint> {
        self.bidders.get(id).map(|entry| entry.value().clone())
    }

    /// Point-in-time copy of all registered endpoints, sorted by id.
    ///
    /// The round dispatcher works off this copy, not the live map, so
    /// concurrent registrations cannot mutate a round's participant set.
    pub fn snapshot(&self) -> Vec<BidderEndpoint> {
        let mut endpoints: Vec<BidderEndpoint> = self
            .bidders
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        endpoints.sort_by(|a, b| a.id.cmp(&b.id));
        endpoints
    }

    /// Registered bidder ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.bidders.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.bidders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bidders.is_empty()
    }
}
