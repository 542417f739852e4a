use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Auctioneer service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the auctioneer listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-call budget for one bid solicitation, in milliseconds. This is
    /// the only tunable the round orchestrator depends on.
    #[serde(default = "default_solicit_timeout_ms")]
    pub solicit_timeout_ms: u64,
}

fn default_port() -> u16 {
    8080
}

fn default_solicit_timeout_ms() -> u64 {
    200
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            solicit_timeout_ms: default_solicit_timeout_ms(),
        }
    }
}

impl ServerConfig {
    /// Load config from a TOML file. Returns defaults if the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Apply environment overrides: `AUCTIONEER_PORT`, `SOLICIT_TIMEOUT_MS`.
    pub fn overlay_env(mut self) -> Result<Self> {
        if let Ok(port) = std::env::var("AUCTIONEER_PORT") {
            self.port = port
                .parse()
                .context("AUCTIONEER_PORT is not a valid port")?;
        }
        if let Ok(ms) = std::env::var("SOLICIT_TIMEOUT_MS") {
            self.solicit_timeout_ms = ms.parse().context("SOLICIT_TIMEOUT_MS is not a number")?;
        }
        Ok(self)
    }

    pub fn solicit_timeout(&self) -> Duration {
        Duration::from_millis(self.solicit_timeout_ms)
    }
}
