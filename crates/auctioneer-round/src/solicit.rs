use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use auctioneer_types::{AuctionError, BidRecord, BidderEndpoint};

/// Auction invitation posted to each bidder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub auction_id: String,
}

/// Reply expected from a bidder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidReply {
    pub bidder_id: String,
    pub value: f64,
}

/// Why one solicitation produced no bid.
///
/// Every variant gets the same treatment: the bidder is excluded from the
/// round and nothing propagates to the dispatcher.
#[derive(Debug, Error)]
pub enum SolicitError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("bidder answered with status {0}")]
    BadStatus(StatusCode),

    #[error("malformed bid reply: {0}")]
    MalformedReply(#[source] reqwest::Error),

    #[error("reply identity mismatch: solicited {expected}, reply claims {got}")]
    IdentityMismatch { expected: String, got: String },

    #[error("invalid bid value: {0}")]
    InvalidValue(f64),
}

/// Solicits one bid per call over a shared HTTP client.
///
/// The client carries the per-call budget, so a bidder that neither replies
/// nor fails within it times out of the round. Cheap to clone; all clones
/// share one connection pool.
#[derive(Debug, Clone)]
pub struct BidderClient {
    client: Client,
}

impl BidderClient {
    pub fn new(call_budget: Duration) -> Result<Self, AuctionError> {
        let client = Client::builder()
            .timeout(call_budget)
            .build()
            .map_err(|e| AuctionError::Internal(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }

    /// Solicit exactly one bidder: send the invitation, await the reply under
    /// the call budget, validate it into a [`BidRecord`]. Single attempt, no
    /// retries.
    pub async fn solicit(
        &self,
        endpoint: &BidderEndpoint,
        auction_id: &str,
    ) -> Result<BidRecord, SolicitError> {
        let invitation = Invitation {
            auction_id: auction_id.to_string(),
        };
        let response = self
            .client
            .post(endpoint.invite_url())
            .json(&invitation)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SolicitError::BadStatus(status));
        }

        let reply: BidReply = response.json().await.map_err(SolicitError::MalformedReply)?;

        // A reply claiming a different identity would plant a non-participant
        // in the ledger.
        if reply.bidder_id != endpoint.id {
            return Err(SolicitError::IdentityMismatch {
                expected: endpoint.id.clone(),
                got: reply.bidder_id,
            });
        }
        if !reply.value.is_finite() || reply.value < 0.0 {
            return Err(SolicitError::InvalidValue(reply.value));
        }

        Ok(BidRecord::new(reply.bidder_id, reply.value))
    }
}
