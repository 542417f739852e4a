use std::collections::BTreeMap;

use auctioneer_types::BidRecord;

/// Pick the highest bid from a closed ledger snapshot.
///
/// Linear scan in snapshot order, which for the ledger's `BTreeMap` is
/// lexicographic by bidder id. A later entry replaces the leader only on a
/// strictly greater value, so equal-maximum ties go to the lexicographically
/// smallest bidder id. An empty snapshot has no winner.
pub fn select_winner(snapshot: &BTreeMap<String, f64>) -> Option<BidRecord> {
    let mut leader: Option<BidRecord> = None;
    for (bidder_id, &value) in snapshot {
        let beats = leader.as_ref().is_none_or(|l| value > l.value);
        if beats {
            leader = Some(BidRecord::new(bidder_id.clone(), value));
        }
    }
    leader
}
