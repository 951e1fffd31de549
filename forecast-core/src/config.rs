use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::transport::DEFAULT_TIMEOUT;

/// Forecast endpoint; `{id}` and `{token}` are substituted per request.
pub const DEFAULT_ENDPOINT: &str =
    "https://api.openweathermap.org/data/2.5/forecast?id={id}&APPID={token}";

/// Client configuration supplied by the caller.
///
/// Example TOML:
/// ```toml
/// token = "..."
/// endpoint = "https://api.openweathermap.org/data/2.5/forecast?id={id}&APPID={token}"
/// debug = true
/// timeout_ms = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub token: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Buffer and log raw response bodies.
    #[serde(default)]
    pub debug: bool,

    /// Transport timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_ms() -> u64 {
    duration_to_ms(DEFAULT_TIMEOUT)
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            endpoint: default_endpoint(),
            debug: false,
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_to_ms(timeout);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse client configuration")
    }

    /// Load config from a TOML file chosen by the caller.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: ClientConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }
}
