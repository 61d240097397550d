//! Configuration Module
//!
//! Handles loading client configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default byte quota of the durable cache file, same order as browser storage
pub const DEFAULT_CACHE_QUOTA: usize = 5 * 1024 * 1024;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Ledgr REST API
    pub api_url: String,
    /// Bearer token attached to every request, if any
    pub api_token: Option<String>,
    /// Directory of the durable cache file; None keeps the cache in memory
    pub cache_dir: Option<PathBuf>,
    /// Byte quota of the durable cache file
    pub cache_quota: usize,
    /// TTL of cached invoice lists in milliseconds
    pub list_ttl_ms: u64,
    /// TTL of cached template lists in milliseconds
    pub template_ttl_ms: u64,
    /// TTL of cached PDF blobs in milliseconds
    pub blob_ttl_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LEDGR_API_URL` - API base URL (default: http://localhost:8080)
    /// - `LEDGR_API_TOKEN` - Bearer token (default: unset)
    /// - `LEDGR_CACHE_DIR` - Durable cache directory (default: unset, in-memory)
    /// - `LEDGR_CACHE_QUOTA` - Durable cache quota in bytes (default: 5 MiB)
    /// - `LIST_TTL_MS` - Invoice list TTL (default: 30000)
    /// - `TEMPLATE_TTL_MS` - Template list TTL (default: 60000)
    /// - `BLOB_TTL_MS` - PDF blob TTL (default: 60000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("LEDGR_API_URL").unwrap_or(defaults.api_url),
            api_token: env::var("LEDGR_API_TOKEN").ok().filter(|t| !t.is_empty()),
            cache_dir: env::var("LEDGR_CACHE_DIR")
                .ok()
                .filter(|d| !d.is_empty())
                .map(PathBuf::from),
            cache_quota: parse_var("LEDGR_CACHE_QUOTA").unwrap_or(defaults.cache_quota),
            list_ttl_ms: parse_var("LIST_TTL_MS").unwrap_or(defaults.list_ttl_ms),
            template_ttl_ms: parse_var("TEMPLATE_TTL_MS").unwrap_or(defaults.template_ttl_ms),
            blob_ttl_ms: parse_var("BLOB_TTL_MS").unwrap_or(defaults.blob_ttl_ms),
        }
    }

    pub fn list_ttl(&self) -> Duration {
        Duration::from_millis(self.list_ttl_ms)
    }

    pub fn template_ttl(&self) -> Duration {
        Duration::from_millis(self.template_ttl_ms)
    }

    pub fn blob_ttl(&self) -> Duration {
        Duration::from_millis(self.blob_ttl_ms)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            api_token: None,
            cache_dir: None,
            cache_quota: DEFAULT_CACHE_QUOTA,
            list_ttl_ms: 30_000,
            template_ttl_ms: 60_000,
            blob_ttl_ms: 60_000,
        }
    }
}
