use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use auctioneer_server::config::ServerConfig;
use auctioneer_server::handlers;
use auctioneer_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::var("AUCTIONEER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("auctioneer.toml"));
    let config = ServerConfig::load(&config_path)?.overlay_env()?;

    let state = AppState::new(config.solicit_timeout())?;
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        port = local_addr.port(),
        solicit_timeout_ms = config.solicit_timeout_ms,
        "serving auctioneer"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
