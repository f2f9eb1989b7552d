//! TOML configuration for the fetch side.
//!
//! Every key is optional; a missing key takes the default shown below.
//!
//! ```toml
//! provider = "yahoo"          # or "upstox"
//! exchange = "nse"
//! request_timeout_secs = 30
//! requests_per_second = 5
//! cache_ttl_secs = 300
//!
//! [retry]
//! max_attempts = 3
//! base_delay_ms = 1000
//! multiplier = 2.0
//!
//! [yahoo]
//! base_url = "https://query1.finance.yahoo.com"
//!
//! [upstox]
//! base_url = "https://api.upstox.com"
//! ```

use std::{
    fmt, fs,
    num::NonZeroU32,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use log::{error, info};
use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{models::exchange::Exchange, retry::RetryPolicy};

/// Errors related to loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which vendor serves the bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Upstox,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yahoo => f.write_str("yahoo"),
            Self::Upstox => f.write_str("upstox"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "upstox" => Ok(Self::Upstox),
            other => Err(format!("Unknown provider: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            multiplier: self.multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    pub base_url: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstoxConfig {
    pub base_url: String,
}

impl Default for UpstoxConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.upstox.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestorConfig {
    pub provider: ProviderKind,
    pub exchange: Exchange,
    pub request_timeout_secs: u64,
    pub requests_per_second: NonZeroU32,
    /// Zero disables the response cache.
    pub cache_ttl_secs: u64,
    pub retry: RetryConfig,
    pub yahoo: YahooConfig,
    pub upstox: UpstoxConfig,
}

impl Default for IngestorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            exchange: Exchange::default(),
            request_timeout_secs: 30,
            requests_per_second: nonzero!(5u32),
            cache_ttl_secs: 300,
            retry: RetryConfig::default(),
            yahoo: YahooConfig::default(),
            upstox: UpstoxConfig::default(),
        }
    }
}

impl IngestorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Loads the configuration.
    ///
    /// Without a path the defaults are used; an explicit path must be readable.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|source| {
            error!("Failed to read config file {}: {source}", path.display());
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::from_toml_str(&content).inspect_err(|e| {
            error!("Invalid config file {}: {e}", path.display());
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = IngestorConfig::from_toml_str("").unwrap();
        assert_eq!(config, IngestorConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry.policy(), RetryPolicy::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = IngestorConfig::from_toml_str(
            r#"
            provider = "upstox"
            exchange = "bse"
            requests_per_second = 2

            [retry]
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.provider, ProviderKind::Upstox);
        assert_eq!(config.exchange, Exchange::Bse);
        assert_eq!(config.requests_per_second.get(), 2);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.upstox.base_url, "https://api.upstox.com");
    }

    #[test]
    fn zero_rate_is_rejected() {
        let err = IngestorConfig::from_toml_str("requests_per_second = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "cache_ttl_secs = 60\n[yahoo]\nbase_url = \"http://localhost:9000\""
        )
        .unwrap();

        let config = IngestorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.yahoo.base_url, "http://localhost:9000");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("candle_dash.toml");

        let err = IngestorConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(IngestorConfig::load(None).unwrap(), IngestorConfig::default());
    }

    #[test]
    fn provider_kind_parses() {
        assert_eq!("Upstox".parse::<ProviderKind>().unwrap(), ProviderKind::Upstox);
        assert!("alpaca".parse::<ProviderKind>().is_err());
    }
}
