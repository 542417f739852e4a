use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use auctioneer_bidder::{BidderSettings, register_with, router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let id = std::env::var("BIDDER_ID").context("BIDDER_ID is not set")?;
    let value: f64 = std::env::var("BID_VALUE")
        .context("BID_VALUE is not set")?
        .parse()
        .context("BID_VALUE is not a number")?;
    let port: u16 = std::env::var("BIDDER_PORT")
        .context("BIDDER_PORT is not set")?
        .parse()
        .context("BIDDER_PORT is not a valid port")?;
    let delay_ms: Option<u64> = std::env::var("BID_DELAY_MS")
        .ok()
        .map(|v| v.parse())
        .transpose()
        .context("BID_DELAY_MS is not a number")?;
    let auctioneer_url =
        std::env::var("AUCTIONEER_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let advertised_url =
        std::env::var("BIDDER_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

    let mut settings = BidderSettings::new(id.clone(), value);
    if let Some(ms) = delay_ms {
        settings = settings.with_delay(Duration::from_millis(ms));
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    let local_addr = listener.local_addr()?;

    register_with(&auctioneer_url, &id, &advertised_url)
        .await
        .context("registration with the auctioneer failed")?;
    tracing::info!(bidder_id = %id, %auctioneer_url, "registration successful");

    tracing::info!(port = local_addr.port(), "serving bidder");
    axum::serve(listener, router(settings)).await?;
    Ok(())
}
