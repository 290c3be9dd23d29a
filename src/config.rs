//! Configuration Module
//!
//! Handles loading configuration from environment variables.

use std::env;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for cached page bodies
    pub page_ttl: u64,
    /// Background purge task interval in seconds
    pub purge_interval: u64,
    /// HTTP fetcher timeout in seconds
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PAGE_TTL` - Page cache TTL in seconds (default: 10)
    /// - `PURGE_INTERVAL` - Purge frequency in seconds (default: 1)
    /// - `FETCH_TIMEOUT` - HTTP fetch timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            page_ttl: env::var("PAGE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            purge_interval: env::var("PURGE_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            fetch_timeout: env::var("FETCH_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_ttl: 10,
            purge_interval: 1,
            fetch_timeout: 30,
        }
    }
}
