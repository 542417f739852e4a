use std::collections::BTreeMap;

use async_trait::async_trait;

use auctioneer_types::AuctionError;

/// Per-round bid store, safe under concurrent writers.
///
/// One instance belongs to exactly one round; it is written by that round's
/// solicitation tasks and read once, at close.
#[async_trait]
pub trait BidLedger: Send + Sync {
    /// Upsert the bid for a bidder. A later write for the same bidder
    /// overwrites the earlier one; it never duplicates.
    ///
    /// Fails with [`AuctionError::LedgerClosed`] once the round has closed,
    /// so a straggler task cannot write into a snapshotted ledger.
    async fn record(&self, bidder_id: &str, value: f64) -> Result<(), AuctionError>;

    /// Close the ledger and return the point-in-time snapshot.
    ///
    /// Callable exactly once; a second close is a contract violation and
    /// fails with [`AuctionError::LedgerClosed`]. The snapshot enumerates in
    /// lexicographic bidder-id order.
    async fn close(&self) -> Result<BTreeMap<String, f64>, AuctionError>;
}
