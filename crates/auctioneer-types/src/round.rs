use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bidder::BidderEndpoint;
use super::error::AuctionError;

/// Round lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    Idle,
    Dispatching,
    AwaitingCompletion,
    Closed,
}

/// Events that drive round phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundEvent {
    Dispatch,
    TasksLaunched,
    TasksCompleted,
}

impl RoundPhase {
    /// Attempt a phase transition given an event.
    /// Returns the new phase or an error if the transition is invalid.
    pub fn transition(self, event: RoundEvent) -> super::error::Result<RoundPhase> {
        match (self, event) {
            (RoundPhase::Idle, RoundEvent::Dispatch) => Ok(RoundPhase::Dispatching),
            (RoundPhase::Dispatching, RoundEvent::TasksLaunched) => {
                Ok(RoundPhase::AwaitingCompletion)
            }
            (RoundPhase::AwaitingCompletion, RoundEvent::TasksCompleted) => Ok(RoundPhase::Closed),

            // All other transitions are invalid
            (phase, event) => Err(AuctionError::InvalidPhaseTransition { from: phase, event }),
        }
    }
}

/// One bid collected from a bidder during a round.
///
/// `value` is a non-negative amount; zero is a valid bid, not a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidRecord {
    pub bidder_id: String,
    pub value: f64,
}

impl BidRecord {
    pub fn new(bidder_id: impl Into<String>, value: f64) -> Self {
        Self {
            bidder_id: bidder_id.into(),
            value,
        }
    }
}

/// Result of a closed round.
///
/// `NoBids` is distinct from a winner with value zero: a bidder that never
/// responded contributes nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RoundOutcome {
    Winner(BidRecord),
    NoBids,
}

impl RoundOutcome {
    pub fn winner(&self) -> Option<&BidRecord> {
        match self {
            RoundOutcome::Winner(record) => Some(record),
            RoundOutcome::NoBids => None,
        }
    }

    pub fn has_winner(&self) -> bool {
        self.winner().is_some()
    }
}

impl From<Option<BidRecord>> for RoundOutcome {
    fn from(selection: Option<BidRecord>) -> Self {
        match selection {
            Some(record) => RoundOutcome::Winner(record),
            None => RoundOutcome::NoBids,
        }
    }
}

/// One auction round: exists only for the lifetime of a single dispatch.
#[derive(Debug, Clone)]
pub struct AuctionRound {
    pub auction_id: String,
    pub participants: Vec<BidderEndpoint>,
    pub phase: RoundPhase,
    pub started_at: DateTime<Utc>,
    /// Upper bound on round close. Tasks run concurrently, so the per-call
    /// budget bounds the whole round, not the sum over participants.
    pub deadline: DateTime<Utc>,
}

impl AuctionRound {
    pub fn new(
        auction_id: impl Into<String>,
        participants: Vec<BidderEndpoint>,
        call_budget: Duration,
    ) -> Self {
        let started_at = Utc::now();
        let deadline = started_at + chrono::Duration::milliseconds(call_budget.as_millis() as i64);
        Self {
            auction_id: auction_id.into(),
            participants,
            phase: RoundPhase::Idle,
            started_at,
            deadline,
        }
    }

    /// Apply a phase transition event.
    pub fn apply_event(&mut self, event: RoundEvent) -> super::error::Result<()> {
        self.phase = self.phase.transition(event)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_full_lifecycle() {
        let mut phase = RoundPhase::Idle;
        let events = [
            RoundEvent::Dispatch,
            RoundEvent::TasksLaunched,
            RoundEvent::TasksCompleted,
        ];
        for event in events {
            phase = phase.transition(event).unwrap();
        }
        assert_eq!(phase, RoundPhase::Closed);
    }

    #[test]
    fn test_invalid_transition() {
        let phase = RoundPhase::Idle;
        let result = phase.transition(RoundEvent::TasksCompleted);
        assert!(result.is_err());
    }

    #[test]
    fn test_closed_is_terminal() {
        let phase = RoundPhase::Closed;
        assert!(phase.transition(RoundEvent::Dispatch).is_err());
        assert!(phase.transition(RoundEvent::TasksLaunched).is_err());
        assert!(phase.transition(RoundEvent::TasksCompleted).is_err());
    }

    #[test]
    fn test_round_walks_phases() {
        let mut round = AuctionRound::new("auction-1", Vec::new(), Duration::from_millis(200));
        assert_eq!(round.phase, RoundPhase::Idle);
        assert!(round.deadline > round.started_at);

        round.apply_event(RoundEvent::Dispatch).unwrap();
        round.apply_event(RoundEvent::TasksLaunched).unwrap();
        round.apply_event(RoundEvent::TasksCompleted).unwrap();
        assert_eq!(round.phase, RoundPhase::Closed);
    }

    #[test]
    fn test_outcome_serde_shape() {
        let outcome = RoundOutcome::Winner(BidRecord::new("b1", 12.5));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "winner");
        assert_eq!(json["bidder_id"], "b1");
        assert_eq!(json["value"], 12.5);

        let no_bids = serde_json::to_value(&RoundOutcome::NoBids).unwrap();
        assert_eq!(no_bids["outcome"], "no_bids");
    }

    #[test]
    fn test_outcome_from_selection() {
        let outcome: RoundOutcome = Some(BidRecord::new("b1", 3.0)).into();
        assert!(outcome.has_winner());

        let outcome: RoundOutcome = None.into();
        assert_eq!(outcome, RoundOutcome::NoBids);
        assert!(outcome.winner().is_none());
    }
}
