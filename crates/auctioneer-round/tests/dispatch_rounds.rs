use std::net::SocketAddr;
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::post};

use auctioneer_bidder::BidderSettings;
use auctioneer_round::RoundDispatcher;
use auctioneer_types::{BidRecord, BidderEndpoint, RoundOutcome};

const CALL_BUDGET: Duration = Duration::from_millis(200);

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_bidder(settings: BidderSettings) -> BidderEndpoint {
    let id = settings.id.clone();
    let addr = spawn(auctioneer_bidder::router(settings)).await;
    endpoint(&id, addr)
}

fn endpoint(id: &str, addr: SocketAddr) -> BidderEndpoint {
    BidderEndpoint::new(id, format!("http://{addr}").parse().unwrap())
}

#[tokio::test]
async fn test_highest_responsive_bid_wins() {
    let a1 = spawn_bidder(BidderSettings::new("a1", 12.5)).await;
    let a2 = spawn_bidder(
        BidderSettings::new("a2", 99.0).with_delay(Duration::from_millis(600)),
    )
    .await;
    let a3 = spawn_bidder(BidderSettings::new("a3", 30.0)).await;

    let dispatcher = RoundDispatcher::new(CALL_BUDGET).unwrap();
    let outcome = dispatcher
        .run_round("auction-1", vec![a1, a2, a3])
        .await
        .unwrap();

    // a2 bid the most but slept past the call budget; a3 wins.
    assert_eq!(outcome, RoundOutcome::Winner(BidRecord::new("a3", 30.0)));
}

#[tokio::test]
async fn test_empty_participants_is_no_bids() {
    let dispatcher = RoundDispatcher::new(CALL_BUDGET).unwrap();
    let outcome = dispatcher.run_round("auction-1", Vec::new()).await.unwrap();
    assert_eq!(outcome, RoundOutcome::NoBids);
}

#[tokio::test]
async fn test_malformed_reply_is_no_bids() {
    let app = Router::new().route("/auction/{id}", post(|| async { "no json here" }));
    let addr = spawn(app).await;

    let dispatcher = RoundDispatcher::new(CALL_BUDGET).unwrap();
    let outcome = dispatcher
        .run_round("auction-1", vec![endpoint("b1", addr)])
        .await
        .unwrap();

    assert_eq!(outcome, RoundOutcome::NoBids);
}

#[tokio::test]
async fn test_error_status_is_no_bids() {
    let app = Router::new().route(
        "/auction/{id}",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let addr = spawn(app).await;

    let dispatcher = RoundDispatcher::new(CALL_BUDGET).unwrap();
    let outcome = dispatcher
        .run_round("auction-1", vec![endpoint("b1", addr)])
        .await
        .unwrap();

    assert_eq!(outcome, RoundOutcome::NoBids);
}

#[tokio::test]
async fn test_unreachable_bidder_is_excluded() {
    // Grab an address nobody is listening on.
    let vacant = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let vacant_addr = vacant.local_addr().unwrap();
    drop(vacant);

    let alive = spawn_bidder(BidderSettings::new("alive", 5.0)).await;

    let dispatcher = RoundDispatcher::new(CALL_BUDGET).unwrap();
    let outcome = dispatcher
        .run_round("auction-1", vec![endpoint("gone", vacant_addr), alive])
        .await
        .unwrap();

    assert_eq!(outcome, RoundOutcome::Winner(BidRecord::new("alive", 5.0)));
}

#[tokio::test]
async fn test_identity_mismatch_is_excluded() {
    // Replies under a different identity than the one solicited.
    let app = Router::new().route(
        "/auction/{id}",
        post(|| async {
            Json(serde_json::json!({ "bidder_id": "imposter", "value": 1000.0 }))
        }),
    );
    let addr = spawn(app).await;

    let dispatcher = RoundDispatcher::new(CALL_BUDGET).unwrap();
    let outcome = dispatcher
        .run_round("auction-1", vec![endpoint("victim", addr)])
        .await
        .unwrap();

    assert_eq!(outcome, RoundOutcome::NoBids);
}

#[tokio::test]
async fn test_negative_value_is_excluded() {
    let app = Router::new().route(
        "/auction/{id}",
        post(|| async { Json(serde_json::json!({ "bidder_id": "b1", "value": -3.0 })) }),
    );
    let addr = spawn(app).await;

    let dispatcher = RoundDispatcher::new(CALL_BUDGET).unwrap();
    let outcome = dispatcher
        .run_round("auction-1", vec![endpoint("b1", addr)])
        .await
        .unwrap();

    assert_eq!(outcome, RoundOutcome::NoBids);
}

#[tokio::test]
async fn test_zero_value_bid_still_wins() {
    let b1 = spawn_bidder(BidderSettings::new("b1", 0.0)).await;

    let dispatcher = RoundDispatcher::new(CALL_BUDGET).unwrap();
    let outcome = dispatcher.run_round("auction-1", vec![b1]).await.unwrap();

    // A zero bid that arrived is a winner, not "no bids".
    assert_eq!(outcome, RoundOutcome::Winner(BidRecord::new("b1", 0.0)));
}

#[tokio::test]
async fn test_wide_fanout_selects_the_maximum() {
    let mut participants = Vec::new();
    for i in 0..20 {
        participants
            .push(spawn_bidder(BidderSettings::new(format!("bidder-{i:02}"), i as f64)).await);
    }

    let dispatcher = RoundDispatcher::new(CALL_BUDGET).unwrap();
    let outcome = dispatcher
        .run_round("auction-1", participants)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RoundOutcome::Winner(BidRecord::new("bidder-19", 19.0))
    );
}

#[tokio::test]
async fn test_rounds_do_not_contaminate_each_other() {
    let b1 = spawn_bidder(BidderSettings::new("b1", 10.0)).await;
    let b2 = spawn_bidder(BidderSettings::new("b2", 20.0)).await;

    let dispatcher = RoundDispatcher::new(CALL_BUDGET).unwrap();

    let first = dispatcher
        .run_round("auction-1", vec![b1.clone(), b2])
        .await
        .unwrap();
    assert_eq!(first, RoundOutcome::Winner(BidRecord::new("b2", 20.0)));

    // The second round only invites b1; b2's earlier bid must not leak in.
    let second = dispatcher.run_round("auction-2", vec![b1]).await.unwrap();
    assert_eq!(second, RoundOutcome::Winner(BidRecord::new("b1", 10.0)));
}
