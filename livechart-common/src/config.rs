use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::keyexpr::KEY_PREFIX;
use crate::serialization::Format;

/// Zenoh connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZenohConfig {
    /// Zenoh mode: "client", "peer", or "router".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Endpoints to connect to (for client mode).
    #[serde(default)]
    pub connect: Vec<String>,

    /// Endpoints to listen on (for peer/router mode).
    #[serde(default)]
    pub listen: Vec<String>,
}

fn default_mode() -> String {
    "peer".to_string()
}

impl Default for ZenohConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            connect: Vec::new(),
            listen: Vec::new(),
        }
    }
}

impl ZenohConfig {
    /// Check mode and endpoint syntax.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.mode.as_str(), "client" | "peer" | "router") {
            return Err(Error::Config(format!(
                "Invalid Zenoh mode: '{}'. Expected 'client', 'peer', or 'router'",
                self.mode
            )));
        }

        // Endpoints look like "tcp/host:port".
        for endpoint in self.connect.iter().chain(&self.listen) {
            if !endpoint.contains('/') {
                return Err(Error::Config(format!(
                    "Invalid Zenoh endpoint: '{}'",
                    endpoint
                )));
            }
        }

        Ok(())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive ("info", "livechart=debug,zenoh=warn").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Configuration shared by the viewer and the publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseConfig {
    /// Zenoh connection settings.
    #[serde(default)]
    pub zenoh: ZenohConfig,

    /// Key expression prefix for chart events.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Payload format used when publishing.
    #[serde(default)]
    pub serialization: Format,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_key_prefix() -> String {
    KEY_PREFIX.to_string()
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            zenoh: ZenohConfig::default(),
            key_prefix: default_key_prefix(),
            serialization: Format::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BaseConfig {
    /// Validate the shared settings.
    pub fn validate(&self) -> Result<()> {
        self.zenoh.validate()?;
        validate_key_prefix(&self.key_prefix)
    }
}

/// A key prefix must be non-empty, without a trailing `/` or wildcards.
pub fn validate_key_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty()
        || prefix.starts_with('/')
        || prefix.ends_with('/')
        || prefix.contains(['*', '$', '?', '#'])
    {
        return Err(Error::Config(format!("Invalid key prefix: '{}'", prefix)));
    }

    Ok(())
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Load a configuration file if it exists, otherwise fall back to defaults.
///
/// A file that exists but fails to parse is still an error.
pub fn load_config_or_default<T>(path: impl AsRef<Path>) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        Ok(T::default())
    }
}

/// Load a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}
