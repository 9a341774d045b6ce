//! Configuration for the witintent client.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use witintent_error::IntentError;

pub const DEFAULT_ENDPOINT: &str = "https://api.wit.ai/message";
pub const DEFAULT_API_VERSION: &str = "20170307";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl Default for ConfigFormat {
    fn default() -> Self {
        Self::Yaml
    }
}

impl ConfigFormat {
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ConfigFormat::Json,
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::default(),
        }
    }
}

/// Settings for one classification client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Bearer token sent on every request
    #[serde(default)]
    pub token: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Minimum confidence for an intent to be returned
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Value of the `v` query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Accept any server certificate. Off unless explicitly enabled.
    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Allow idle connections to be pooled between calls
    #[serde(default)]
    pub keep_alive: bool,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            threshold: DEFAULT_THRESHOLD,
            endpoint: default_endpoint(),
            api_version: default_api_version(),
            insecure_skip_verify: false,
            keep_alive: false,
        }
    }
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parsed endpoint URL.
    pub fn endpoint_url(&self) -> Result<Url, IntentError> {
        Url::parse(&self.endpoint)
            .map_err(|e| IntentError::config(format!("invalid endpoint {:?}: {e}", self.endpoint)))
    }

    /// Check ranges and the endpoint. An empty token is allowed; the
    /// service rejects it.
    pub fn validate(&self) -> Result<(), IntentError> {
        validate_threshold(self.threshold)?;
        if self.timeout_ms == 0 {
            return Err(IntentError::config("timeout must be greater than zero"));
        }
        let url = self.endpoint_url()?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(IntentError::config(format!(
                "endpoint scheme must be http or https, got {}",
                url.scheme()
            )));
        }
        Ok(())
    }
}

/// Reject timeouts that round down to zero milliseconds.
pub fn validate_timeout(timeout: Duration) -> Result<(), IntentError> {
    if timeout.as_millis() == 0 {
        return Err(IntentError::config(format!(
            "timeout must be at least 1ms, got {timeout:?}"
        )));
    }
    Ok(())
}

/// Reject thresholds outside `[0, 1]`, NaN included.
pub fn validate_threshold(threshold: f64) -> Result<(), IntentError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(IntentError::config(format!(
            "threshold must be within [0, 1], got {threshold}"
        )))
    }
}

/// Load configuration from a file
pub fn load_config<P: Into<PathBuf>>(path: P) -> anyhow::Result<ClientConfig> {
    let path = path.into();
    let contents = std::fs::read_to_string(&path)?;

    match ConfigFormat::from_path(&path) {
        ConfigFormat::Json => serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON config: {}", e)),
        ConfigFormat::Yaml => serde_yaml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse YAML config: {}", e)),
    }
}

/// Save configuration to a file
pub fn save_config<P: Into<PathBuf>>(config: &ClientConfig, path: P) -> anyhow::Result<()> {
    let path = path.into();
    let contents = match ConfigFormat::from_path(&path) {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON config: {}", e))?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| anyhow::anyhow!("Failed to serialize YAML config: {}", e))?,
    };

    std::fs::write(path, contents)?;
    Ok(())
}
