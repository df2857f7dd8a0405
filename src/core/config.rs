//! Configuration - Type-safe, validated config
//!
//! Every field has a default equal to the reference deployment, so an empty
//! (or missing) `config.toml` yields a working bot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{Balance, Error, Result};

/// Environment variable naming an explicit config path
pub const CONFIG_ENV: &str = "MARKET_BOT_CONFIG";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Order-book feed
    pub feed: FeedConfig,

    /// Timer periods
    pub schedule: ScheduleConfig,

    /// HTTP trigger
    pub server: ServerConfig,

    /// Starting balance
    pub ledger: LedgerConfig,

    /// Candidate generation
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// REST endpoint returning `[[id, price, size], ...]`
    pub url: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "https://api.deversifi.com/bfx/v2/book/tETHUSD/R0".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Period of the order cycle timer
    pub cycle_interval_ms: u64,

    /// Period of the balance report timer
    pub report_interval_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cycle_interval_ms: 5_000,
            report_interval_ms: 30_000,
        }
    }
}

impl ScheduleConfig {
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address for the HTTP trigger
    pub listen_addr: String,

    /// Only this path (GET) runs a cycle; everything else is 404
    pub trigger_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            trigger_path: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Starting base asset (ETH)
    pub initial_base: Decimal,

    /// Starting quote asset (USD)
    pub initial_quote: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        let balance = Balance::default();
        Self {
            initial_base: balance.base,
            initial_quote: balance.quote,
        }
    }
}

impl LedgerConfig {
    pub fn initial_balance(&self) -> Balance {
        Balance::new(self.initial_base, self.initial_quote)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Iterations per cycle; each emits one ask and one bid
    pub rounds: usize,

    /// Half-width of the price band as a fraction (0.05 = ±5%)
    pub band_pct: Decimal,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rounds: 5,
            band_pct: Decimal::new(5, 2),
        }
    }
}

impl Config {
    /// Load from TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config the binary should run with.
    ///
    /// An explicit `MARKET_BOT_CONFIG` path must load; otherwise `config.toml`
    /// in the working directory is tried, then defaults.
    pub fn load_default() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let config = Self::load(&PathBuf::from(&path))?;
            tracing::info!("Loaded config from {}", path);
            return Ok(config);
        }

        let path = Path::new("config.toml");
        if path.exists() {
            let config = Self::load(path)?;
            tracing::info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        tracing::warn!("No config.toml found, using defaults");
        Ok(Self::default())
    }

    /// Reject values the bot cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.feed.url.trim().is_empty() {
            return Err(Error::Config("feed.url must not be empty".into()));
        }
        if self.feed.timeout_ms == 0 {
            return Err(Error::Config("feed.timeout_ms must be positive".into()));
        }
        if self.schedule.cycle_interval_ms == 0 || self.schedule.report_interval_ms == 0 {
            return Err(Error::Config("schedule intervals must be positive".into()));
        }
        if !self.server.trigger_path.starts_with('/') {
            return Err(Error::Config(format!(
                "server.trigger_path must start with '/': {}",
                self.server.trigger_path
            )));
        }
        if self.ledger.initial_base.is_sign_negative() || self.ledger.initial_quote.is_sign_negative() {
            return Err(Error::Config("initial balances must be non-negative".into()));
        }
        if self.generator.band_pct <= Decimal::ZERO || self.generator.band_pct >= Decimal::ONE {
            return Err(Error::Config(format!(
                "generator.band_pct must be in (0, 1): {}",
                self.generator.band_pct
            )));
        }
        Ok(())
    }
}
