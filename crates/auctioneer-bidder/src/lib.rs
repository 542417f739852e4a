use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};

/// How this bidder behaves when invited to a round.
#[derive(Debug, Clone)]
pub struct BidderSettings {
    pub id: String,
    /// The amount this bidder offers for every auction.
    pub value: f64,
    /// Artificial delay before replying. A delay beyond the auctioneer's
    /// per-call budget drops this bidder out of the round.
    pub delay: Option<Duration>,
}

impl BidderSettings {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Auction invitation received from the auctioneer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionInvitation {
    pub auction_id: String,
}

/// The bid this service replies with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidResponse {
    pub bidder_id: String,
    pub value: f64,
}

pub fn router(settings: BidderSettings) -> Router {
    Router::new()
        .route("/auction/{bidder_id}", post(handle_invitation))
        .with_state(Arc::new(settings))
}

async fn handle_invitation(
    State(settings): State<Arc<BidderSettings>>,
    Path(bidder_id): Path<String>,
    Json(invitation): Json<AuctionInvitation>,
) -> Result<Json<BidResponse>, StatusCode> {
    if bidder_id != settings.id {
        return Err(StatusCode::NOT_FOUND);
    }
    tracing::debug!(auction_id = %invitation.auction_id, "invitation received");

    if let Some(delay) = settings.delay {
        tokio::time::sleep(delay).await;
    }

    Ok(Json(BidResponse {
        bidder_id: settings.id.clone(),
        value: settings.value,
    }))
}

/// Identity announced to the auctioneer's `/registration` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub bidder_id: String,
    pub bidder_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("registration rejected with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// Announce this bidder to an auctioneer.
///
/// `bidder_url` is the base URL the auctioneer should invite us on.
pub async fn register_with(
    auctioneer_url: &str,
    bidder_id: &str,
    bidder_url: &str,
) -> Result<(), RegistrationError> {
    let request = RegistrationRequest {
        bidder_id: bidder_id.to_string(),
        bidder_url: bidder_url.to_string(),
    };
    let response = reqwest::Client::new()
        .post(format!(
            "{}/registration",
            auctioneer_url.trim_end_matches('/')
        ))
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(RegistrationError::Rejected(status));
    }
    Ok(())
}
