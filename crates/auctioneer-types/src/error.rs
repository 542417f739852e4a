use thiserror::Error;

use crate::round::{RoundEvent, RoundPhase};

#[derive(Debug, Error)]
pub enum AuctionError {
    #[error("Phase transition error: cannot leave {from:?} via {event:?}")]
    InvalidPhaseTransition { from: RoundPhase, event: RoundEvent },

    #[error("Bidder already registered: {0}")]
    BidderAlreadyRegistered(String),

    #[error("Invalid bidder address: {0}")]
    InvalidBidderAddress(String),

    #[error("Ledger is closed")]
    LedgerClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuctionError>;
