//! Session Configuration
//!
//! Supports config files and `AGENTSPHERE__*` environment variables.

use crate::ConfigError;
use agentsphere_types::{Address, ChainId, DEMO_CHAIN_ID, DEMO_WALLET_ADDRESS};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "AGENTSPHERE";

/// How a live connect treats accounts granted in an earlier session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconnectPolicy {
    /// Always prompt with an account request
    #[default]
    RequestPermission,
    /// Use already-granted accounts when there are any; prompt otherwise
    ReuseGranted,
}

/// Wallet session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Simulated connect latency in demo mode
    #[serde(default = "default_demo_latency_ms")]
    pub demo_latency_ms: u64,

    /// Account installed by the demo wallet
    #[serde(default = "default_demo_account")]
    pub demo_account: String,

    /// Chain reported by the demo wallet
    #[serde(default = "default_demo_chain_id")]
    pub demo_chain_id: u64,

    /// Live reconnect behaviour
    #[serde(default)]
    pub reconnect_policy: ReconnectPolicy,

    /// Pick up an already-granted account when the session starts
    #[serde(default = "default_true")]
    pub restore_on_start: bool,

    /// Install the demo identity at construction
    #[serde(default)]
    pub start_in_demo_mode: bool,

    /// Session event bus capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            demo_latency_ms: default_demo_latency_ms(),
            demo_account: default_demo_account(),
            demo_chain_id: default_demo_chain_id(),
            reconnect_policy: ReconnectPolicy::default(),
            restore_on_start: true,
            start_in_demo_mode: false,
            event_capacity: default_event_capacity(),
        }
    }
}

impl SessionConfig {
    /// Demo connect latency
    pub fn demo_latency(&self) -> Duration {
        Duration::from_millis(self.demo_latency_ms)
    }

    /// Parsed demo identity
    pub fn demo_identity(&self) -> Result<(Address, ChainId), ConfigError> {
        let account = Address::parse(&self.demo_account)
            .map_err(|e| ConfigError::invalid("demo_account", e.to_string()))?;
        Ok((account, ChainId(self.demo_chain_id)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::invalid("event_capacity", "must be greater than zero"));
        }
        self.demo_identity()?;
        Ok(())
    }

    /// Load from `.env`, optional file(s) and environment
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let config: Self = load_layered(config_path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Layered loader shared by every agentsphere config struct
///
/// Sources, lowest precedence first: `config/default`, `config/local`, the
/// explicit path, then `AGENTSPHERE__*` environment variables (`__` separates
/// nested keys).
pub fn load_layered<T: DeserializeOwned>(config_path: Option<&str>) -> Result<T, ConfigError> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let mut builder = config::Config::builder()
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::File::with_name("config/local").required(false));

    if let Some(path) = config_path {
        builder = builder.add_source(config::File::with_name(path).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    Ok(builder.build()?.try_deserialize()?)
}

// =============================================================================
// Default Functions
// =============================================================================

fn default_demo_latency_ms() -> u64 {
    1000
}

fn default_demo_account() -> String {
    DEMO_WALLET_ADDRESS.to_string()
}

fn default_demo_chain_id() -> u64 {
    DEMO_CHAIN_ID.value()
}

fn default_event_capacity() -> usize {
    256
}

fn default_true() -> bool {
    true
}
