//! CLI configuration
//!
//! The `session` table maps onto [`SessionConfig`]; `logging` controls the
//! subscriber installed at startup. Environment overrides use the same
//! `AGENTSPHERE__*` prefix, e.g. `AGENTSPHERE__SESSION__DEMO_LATENCY_MS=250`.

use agentsphere_wallet::config::load_layered;
use agentsphere_wallet::SessionConfig;
use serde::{Deserialize, Serialize};

/// Complete CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        let config: Self = load_layered(config_path)?;
        config.session.validate()?;
        Ok(config)
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.session.demo_latency_ms, 1000);
    }

    #[test]
    fn test_nested_session_table() {
        let config: AppConfig = serde_json::from_str(
            r#"{"session": {"start_in_demo_mode": true}, "logging": {"format": "json"}}"#,
        )
        .unwrap();
        assert!(config.session.start_in_demo_mode);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }
}
