//! Client configuration with validation.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Name used in lifecycle errors and log fields
    pub object_name: String,
    /// Retry policy for the startup method catalog fetch
    pub metadata_fetch: MetadataFetchConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            object_name: "SignedRpcClient".to_string(),
            metadata_fetch: MetadataFetchConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables, falling back to defaults.
    ///
    /// # Environment Variables
    ///
    /// - `SIGNED_RPC_OBJECT_NAME`: Object name (default: SignedRpcClient)
    /// - `SIGNED_RPC_METADATA_MAX_ATTEMPTS`: Cap on timed-out catalog fetches (default: unbounded)
    /// - `SIGNED_RPC_METADATA_BACKOFF_MS`: Initial backoff between attempts (default: 0)
    /// - `SIGNED_RPC_METADATA_MAX_BACKOFF_MS`: Backoff ceiling (default: 5000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let fetch = defaults.metadata_fetch.clone();

        Self {
            object_name: env::var("SIGNED_RPC_OBJECT_NAME").unwrap_or(defaults.object_name),
            metadata_fetch: MetadataFetchConfig {
                max_attempts: env::var("SIGNED_RPC_METADATA_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .or(fetch.max_attempts),
                initial_backoff_ms: env::var("SIGNED_RPC_METADATA_BACKOFF_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(fetch.initial_backoff_ms),
                max_backoff_ms: env::var("SIGNED_RPC_METADATA_MAX_BACKOFF_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(fetch.max_backoff_ms),
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.object_name.trim().is_empty() {
            return Err(ConfigError::EmptyObjectName);
        }

        if self.metadata_fetch.max_attempts == Some(0) {
            return Err(ConfigError::InvalidRetry(
                "max_attempts cannot be 0".into(),
            ));
        }

        if self.metadata_fetch.initial_backoff_ms > self.metadata_fetch.max_backoff_ms {
            return Err(ConfigError::InvalidRetry(format!(
                "initial_backoff_ms ({}) exceeds max_backoff_ms ({})",
                self.metadata_fetch.initial_backoff_ms, self.metadata_fetch.max_backoff_ms
            )));
        }

        Ok(())
    }
}

/// Retry policy for fetching the server method catalog.
///
/// Only timeouts are retried; any other failure aborts construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataFetchConfig {
    /// Maximum number of attempts. `None` retries timeouts forever.
    pub max_attempts: Option<u32>,
    /// Delay after the first timed-out attempt, doubled after each further one.
    pub initial_backoff_ms: u64,
    /// Upper bound for the delay.
    pub max_backoff_ms: u64,
}

impl Default for MetadataFetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            initial_backoff_ms: 0,
            max_backoff_ms: 5_000,
        }
    }
}

impl MetadataFetchConfig {
    /// Delay to wait after `failed_attempts` consecutive timeouts.
    pub fn backoff_after(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1).min(20);
        let millis = self
            .initial_backoff_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }

    /// Whether another attempt is allowed after `attempts` have been made.
    pub fn allows_retry(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `object_name` is empty or whitespace.
    #[error("object name cannot be empty")]
    EmptyObjectName,

    /// The metadata fetch policy is inconsistent.
    #[error("invalid metadata retry policy: {0}")]
    InvalidRetry(String),
}
