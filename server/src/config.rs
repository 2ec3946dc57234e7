//! Configuration management for the server.

use quotebook_engine::MergeStrategy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Remote collection polled when `QUOTEBOOK_REMOTE_URL` is unset.
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory holding the persisted key-value files
    pub data_dir: PathBuf,
    /// Remote post collection to sync with
    pub remote_url: String,
    /// Period between automatic syncs
    pub sync_interval: Duration,
    /// Timeout applied to every remote request
    pub request_timeout: Duration,
    /// Conflict policy for same-id quotes
    pub merge_strategy: MergeStrategy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let data_dir = lookup("QUOTEBOOK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        let remote_url =
            lookup("QUOTEBOOK_REMOTE_URL").unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string());

        let sync_interval = parse_secs(
            lookup("QUOTEBOOK_SYNC_INTERVAL_SECS"),
            30,
            ConfigError::InvalidSyncInterval,
        )?;

        let request_timeout = parse_secs(
            lookup("QUOTEBOOK_REQUEST_TIMEOUT_SECS"),
            10,
            ConfigError::InvalidRequestTimeout,
        )?;

        let merge_strategy = match lookup("QUOTEBOOK_MERGE_STRATEGY") {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidMergeStrategy)?,
            None => MergeStrategy::default(),
        };

        Ok(Self {
            host,
            port,
            data_dir,
            remote_url,
            sync_interval,
            request_timeout,
            merge_strategy,
        })
    }
}

/// Parse a positive number of seconds, defaulting when unset.
fn parse_secs(raw: Option<String>, default: u64, err: ConfigError) -> Result<Duration, ConfigError> {
    let secs = match raw {
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| err.clone())?,
        None => default,
    };
    if secs == 0 {
        return Err(err);
    }
    Ok(Duration::from_secs(secs))
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("QUOTEBOOK_SYNC_INTERVAL_SECS must be a positive integer")]
    InvalidSyncInterval,

    #[error("QUOTEBOOK_REQUEST_TIMEOUT_SECS must be a positive integer")]
    InvalidRequestTimeout,

    #[error("Invalid QUOTEBOOK_MERGE_STRATEGY: {0}")]
    InvalidMergeStrategy(String),
}
