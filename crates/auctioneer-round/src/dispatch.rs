use std::time::Duration;

use auctioneer_ledger::{BidLedger, InMemoryBidLedger};
use auctioneer_types::{AuctionRound, BidderEndpoint, Result, RoundEvent, RoundOutcome};

use crate::solicit::BidderClient;
use crate::winner::select_winner;

/// Orchestrates auction rounds: fans one solicitation task out per
/// participant, joins on all of them, then selects the winner from the
/// closed ledger.
///
/// The dispatcher itself holds no round state; everything mutable is scoped
/// to one `run_round` call, so concurrent rounds cannot contaminate each
/// other.
#[derive(Debug, Clone)]
pub struct RoundDispatcher {
    client: BidderClient,
    call_budget: Duration,
}

impl RoundDispatcher {
    pub fn new(call_budget: Duration) -> Result<Self> {
        Ok(Self {
            client: BidderClient::new(call_budget)?,
            call_budget,
        })
    }

    /// Run one full round over a participants snapshot.
    ///
    /// The snapshot is fixed at entry; bidders registered afterwards wait
    /// for the next round. The join is a barrier over every solicitation
    /// task, success or failure, so the round closes as soon as the slowest
    /// task resolves. Tasks run concurrently, so the per-call budget bounds
    /// the whole round.
    pub async fn run_round(
        &self,
        auction_id: &str,
        participants: Vec<BidderEndpoint>,
    ) -> Result<RoundOutcome> {
        let mut round = AuctionRound::new(auction_id, participants, self.call_budget);
        round.apply_event(RoundEvent::Dispatch)?;
        tracing::info!(
            auction_id,
            participants = round.participants.len(),
            deadline = %round.deadline,
            "dispatching auction round"
        );

        // One fresh ledger per round keeps a straggler from an earlier round
        // out of this one.
        let ledger = InMemoryBidLedger::new();

        let tasks: Vec<_> = round
            .participants
            .iter()
            .map(|endpoint| {
                let client = self.client.clone();
                let ledger = ledger.clone();
                let endpoint = endpoint.clone();
                let auction_id = auction_id.to_string();
                async move { solicit_one(&client, &ledger, &endpoint, &auction_id).await }
            })
            .collect();
        round.apply_event(RoundEvent::TasksLaunched)?;

        futures::future::join_all(tasks).await;
        round.apply_event(RoundEvent::TasksCompleted)?;

        let snapshot = ledger.close().await?;
        let outcome: RoundOutcome = select_winner(&snapshot).into();
        match outcome.winner() {
            Some(winner) => tracing::info!(
                auction_id,
                bidder_id = %winner.bidder_id,
                value = winner.value,
                bids = snapshot.len(),
                "round closed with winner"
            ),
            None => tracing::info!(auction_id, "round closed with no bids"),
        }
        Ok(outcome)
    }
}

/// One solicitation task: at most one outbound call, at most one ledger
/// write. Failures stay local; the bidder is simply absent from the round.
async fn solicit_one(
    client: &BidderClient,
    ledger: &InMemoryBidLedger,
    endpoint: &BidderEndpoint,
    auction_id: &str,
) {
    match client.solicit(endpoint, auction_id).await {
        Ok(record) => match ledger.record(&record.bidder_id, record.value).await {
            Ok(()) => {
                tracing::debug!(bidder_id = %endpoint.id, value = record.value, "bid recorded");
            }
            Err(err) => {
                // The round already closed; the late bid is discarded.
                tracing::warn!(bidder_id = %endpoint.id, %err, "discarding straggler bid");
            }
        },
        Err(err) => {
            tracing::debug!(bidder_id = %endpoint.id, %err, "bidder excluded from round");
        }
    }
}
