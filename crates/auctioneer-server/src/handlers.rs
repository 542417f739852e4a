use std::sync::atomic::Ordering;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use url::Url;
use uuid::Uuid;

use auctioneer_types::{AuctionError, BidderEndpoint, RoundOutcome};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/adrequest", post(run_auction))
        .route("/registration", post(register_bidder))
        .route("/bidderlist", get(list_bidders))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(serde::Deserialize)]
struct AdRequest {
    /// Omitted by ad-slot callers that have no auction authority of their
    /// own; the auctioneer then mints one and echoes it back.
    #[serde(default)]
    auction_id: Option<String>,
}

#[derive(serde::Serialize)]
struct AdResponse {
    auction_id: String,
    #[serde(flatten)]
    outcome: RoundOutcome,
}

async fn run_auction(
    State(state): State<AppState>,
    Json(req): Json<AdRequest>,
) -> Result<Json<AdResponse>, (StatusCode, String)> {
    let auction_id = req
        .auction_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let participants = state.registry.snapshot();
    let outcome = state
        .dispatcher
        .run_round(&auction_id, participants)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let round = state.rounds_completed.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::info!(%auction_id, round, winner = ?outcome.winner(), "auction round served");

    Ok(Json(AdResponse {
        auction_id,
        outcome,
    }))
}

#[derive(serde::Deserialize)]
struct RegistrationRequest {
    bidder_id: String,
    /// Base URL the auctioneer invites this bidder on.
    bidder_url: String,
}

async fn register_bidder(
    State(state): State<AppState>,
    Json(req): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<BidderEndpoint>), (StatusCode, String)> {
    let address: Url = req.bidder_url.parse().map_err(|_| {
        let err = AuctionError::InvalidBidderAddress(req.bidder_url.clone());
        (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    })?;

    let endpoint = BidderEndpoint::new(req.bidder_id, address);
    let registered = endpoint.clone();
    state.registry.register(endpoint).map_err(|err| match err {
        AuctionError::BidderAlreadyRegistered(_) => (StatusCode::CONFLICT, err.to_string()),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    })?;

    tracing::info!(bidder_id = %registered.id, address = %registered.address, "bidder registered");
    Ok((StatusCode::CREATED, Json(registered)))
}

async fn list_bidders(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.registry.ids())
}
