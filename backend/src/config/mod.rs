//! Configuration management for the OneLifeTime backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: OLT__)

use anyhow::Result;
use onelifetime_shared::DigitGrouping;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Life-expectancy data configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file with per-country figures; the fallback table is used when unset
    pub table_path: Option<String>,
}

/// Countdown configuration. Counters always tick once per second.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Countries shown in each of the top and bottom rankings
    pub comparison_count: usize,
    /// Capacity of the tick broadcast channel
    pub update_buffer: usize,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            comparison_count: 5,
            update_buffer: 1024,
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub digit_grouping: DigitGrouping,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            data: DataConfig::default(),
            countdown: CountdownConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with OLT__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (OLT__ prefix)
            // e.g., OLT__DATA__TABLE_PATH=data/life_expectancy.csv
            .add_source(config::Environment::with_prefix("OLT").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.data.table_path.is_none());
        assert_eq!(config.countdown.update_buffer, 1024);
        assert_eq!(config.countdown.comparison_count, 5);
        assert_eq!(config.display.digit_grouping, DigitGrouping::Space);
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
