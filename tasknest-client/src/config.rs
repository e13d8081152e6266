//! Configuration management for the TaskNest client
//!
//! Configuration is loaded from environment variables (and a `.env` file if
//! present).
//!
//! # Environment Variables
//!
//! - `TASKNEST_API_URL`: Base URL of the TaskNest API (default: http://localhost:3000)
//! - `TASKNEST_TIMEOUT_SECS`: Per-request timeout in seconds (default: 10)
//! - `TASKNEST_STATE_DIR`: Where the session is persisted (default: .tasknest)
//! - `TASKNEST_TOAST_TTL_MS`: How long notifications stay visible (default: 3000)
//! - `RUST_LOG`: Log level (default: tasknest_client=info)
//!
//! # Example
//!
//! ```no_run
//! use tasknest_client::config::ClientConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env()?;
//! println!("Talking to {}", config.api.base_url);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Complete client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API connection settings
    pub api: ApiConfig,

    /// Persisted session settings
    pub storage: StorageConfig,

    /// Notification settings
    pub notifications: NotificationConfig,
}

/// API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every API path is appended to (no trailing slash)
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Persisted session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the session file
    pub state_dir: PathBuf,
}

/// Notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Toast lifetime in milliseconds
    pub toast_ttl_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api: ApiConfig {
                base_url: "http://localhost:3000".to_string(),
                timeout_secs: 10,
            },
            storage: StorageConfig {
                state_dir: PathBuf::from(".tasknest"),
            },
            notifications: NotificationConfig { toast_ttl_ms: 3000 },
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A numeric variable does not parse
    /// - `TASKNEST_API_URL` is not an http(s) URL
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let defaults = ClientConfig::default();

        let base_url = env::var("TASKNEST_API_URL").unwrap_or(defaults.api.base_url);
        let timeout_secs = env::var("TASKNEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.api.timeout_secs.to_string())
            .parse::<u64>()?;
        let state_dir = env::var("TASKNEST_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.state_dir);
        let toast_ttl_ms = env::var("TASKNEST_TOAST_TTL_MS")
            .unwrap_or_else(|_| defaults.notifications.toast_ttl_ms.to_string())
            .parse::<u64>()?;

        let config = Self {
            api: ApiConfig {
                base_url: normalize_base_url(&base_url),
                timeout_secs,
            },
            storage: StorageConfig { state_dir },
            notifications: NotificationConfig { toast_ttl_ms },
        };
        config.validate()?;

        Ok(config)
    }

    /// Checks values that cannot be expressed through types
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            anyhow::bail!(
                "TASKNEST_API_URL must start with http:// or https:// (got {})",
                self.api.base_url
            );
        }

        if self.api.timeout_secs == 0 {
            anyhow::bail!("TASKNEST_TIMEOUT_SECS must be > 0");
        }

        Ok(())
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Toast lifetime as a `Duration`
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.notifications.toast_ttl_ms)
    }
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.toast_ttl(), Duration::from_millis(3000));
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url(" https://api.example.com/ "),
            "https://api.example.com"
        );
        assert_eq!(normalize_base_url("http://localhost:3000"), "http://localhost:3000");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = ClientConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
