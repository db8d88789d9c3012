//! Configuration for the chart publisher.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use livechart_common::config::validate_key_prefix;
use livechart_common::{
    DEFAULT_WINDOW_SIZE, Format, KEY_PREFIX, LoggingConfig, ZenohConfig, validate_chart_id,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Common(#[from] livechart_common::Error),
}

/// Complete publisher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Zenoh connection settings.
    #[serde(default)]
    pub zenoh: ZenohConfig,

    /// Key expression prefix (default: "livechart").
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Chart id the snapshots are published to (default: "status").
    #[serde(default = "default_chart")]
    pub chart: String,

    /// Payload format.
    #[serde(default)]
    pub serialization: Format,

    /// Sampling interval in seconds (default: 5).
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Number of samples kept and published (default: 60).
    #[serde(default = "default_window")]
    pub window: usize,

    /// Interfaces counted towards "TCP Out".
    #[serde(default)]
    pub network: NetworkConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_key_prefix() -> String {
    KEY_PREFIX.to_string()
}

fn default_chart() -> String {
    "status".to_string()
}

fn default_interval() -> u64 {
    5
}

fn default_window() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_true() -> bool {
    true
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            zenoh: ZenohConfig::default(),
            key_prefix: default_key_prefix(),
            chart: default_chart(),
            serialization: Format::default(),
            interval_secs: default_interval(),
            window: default_window(),
            network: NetworkConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Network interface filtering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Only include these interfaces (empty = include all).
    #[serde(default)]
    pub include: Vec<String>,

    /// Exclude these interfaces.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Exclude loopback interfaces (default: true).
    #[serde(default = "default_true")]
    pub exclude_loopback: bool,

    /// Exclude virtual interfaces (docker, veth, etc.) (default: false).
    #[serde(default)]
    pub exclude_virtual: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            exclude_loopback: true,
            exclude_virtual: false,
        }
    }
}

impl PublisherConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: PublisherConfig = json5::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zenoh.validate()?;
        validate_key_prefix(&self.key_prefix)?;
        validate_chart_id(&self.chart)?;

        if self.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "interval_secs must be > 0".to_string(),
            ));
        }

        if self.window == 0 {
            return Err(ConfigError::Validation("window must be > 0".to_string()));
        }

        Ok(())
    }
}

impl NetworkConfig {
    /// Check if an interface should be included.
    pub fn should_include(&self, name: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|i| i == name) {
            return false;
        }

        if self.exclude.iter().any(|e| e == name) {
            return false;
        }

        if self.exclude_loopback && (name == "lo" || name.starts_with("lo0")) {
            return false;
        }

        if self.exclude_virtual {
            let virtual_prefixes = ["docker", "veth", "br-", "virbr", "vnet"];
            if virtual_prefixes.iter().any(|p| name.starts_with(p)) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: PublisherConfig = json5::from_str("{}").unwrap();
        config.validate().unwrap();

        assert_eq!(config.key_prefix, "livechart");
        assert_eq!(config.chart, "status");
        assert_eq!(config.interval_secs, 5);
        assert_eq!(config.window, 60);
        assert_eq!(config.serialization, Format::Json);
        assert!(config.network.exclude_loopback);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            zenoh: { mode: "client", connect: ["tcp/localhost:7447"] },
            key_prefix: "lab",
            chart: "server-01",
            serialization: "cbor",
            interval_secs: 1,
            window: 120,
            network: {
                exclude: ["docker0"],
                exclude_virtual: true
            },
            logging: { level: "debug", format: "json" }
        }"#;

        let config: PublisherConfig = json5::from_str(json).unwrap();
        config.validate().unwrap();

        assert_eq!(config.chart, "server-01");
        assert_eq!(config.serialization, Format::Cbor);
        assert_eq!(config.window, 120);
        assert!(config.network.exclude_virtual);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config: PublisherConfig = json5::from_str("{ interval_secs: 0 }").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config: PublisherConfig = json5::from_str("{ window: 0 }").unwrap();
        assert!(config.validate().is_err());

        let config: PublisherConfig = json5::from_str(r#"{ chart: "a/b" }"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Common(_))));
    }

    #[test]
    fn test_network_filter() {
        let config = NetworkConfig {
            include: vec![],
            exclude: vec!["docker0".to_string()],
            exclude_loopback: true,
            exclude_virtual: true,
        };

        assert!(config.should_include("eth0"));
        assert!(!config.should_include("lo"));
        assert!(!config.should_include("docker0"));
        assert!(!config.should_include("veth123"));

        let only_eth0 = NetworkConfig {
            include: vec!["eth0".to_string()],
            ..NetworkConfig::default()
        };
        assert!(only_eth0.should_include("eth0"));
        assert!(!only_eth0.should_include("wlan0"));
    }
}
