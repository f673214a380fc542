//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `origin` is not an http(s) base URL
    /// - `cache_version` is empty or contains separator characters
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.origin.starts_with("http://") && !self.origin.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "origin".into(),
                reason: "must be an http:// or https:// base URL".into(),
            });
        }

        if self.cache_version.is_empty() {
            return Err(ConfigError::Invalid { field: "cache_version".into(), reason: "must not be empty".into() });
        }
        // Bucket names are "<prefix>-<kind>-<version>"; a tag with its own
        // separators would make the stale-bucket sweep ambiguous.
        if !self.cache_version.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
            return Err(ConfigError::Invalid {
                field: "cache_version".into(),
                reason: "must be alphanumeric (dots allowed)".into(),
            });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}
