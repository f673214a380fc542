//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CARTA_*)
//! 2. TOML config file (if CARTA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CARTA_*)
/// 2. TOML config file (if CARTA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the origin the worker fronts.
    ///
    /// Every root-relative request path is resolved against this.
    /// Set via CARTA_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path to the SQLite cache database.
    ///
    /// Set via CARTA_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Cache version tag embedded in bucket names.
    ///
    /// Bumping it orphans the previous buckets, which are swept at
    /// activation. Set via CARTA_CACHE_VERSION environment variable.
    #[serde(default = "default_cache_version")]
    pub cache_version: String,

    /// User-Agent string for upstream requests.
    ///
    /// Set via CARTA_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upstream request timeout in milliseconds.
    ///
    /// Set via CARTA_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via CARTA_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Optional JSON file overriding the built-in precache manifest.
    ///
    /// Set via CARTA_MANIFEST_PATH environment variable.
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,
}

fn default_origin() -> String {
    "http://127.0.0.1:8080".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./carta-cache.sqlite")
}

fn default_cache_version() -> String {
    "v6".into()
}

fn default_user_agent() -> String {
    "carta-sw/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            db_path: default_db_path(),
            cache_version: default_cache_version(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            manifest_path: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CARTA_`
    /// 2. TOML file from `CARTA_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CARTA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CARTA_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.origin, "http://127.0.0.1:8080");
        assert_eq!(config.db_path, PathBuf::from("./carta-cache.sqlite"));
        assert_eq!(config.cache_version, "v6");
        assert_eq!(config.user_agent, "carta-sw/0.1");
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.max_bytes, 5_242_880);
        assert!(config.manifest_path.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }
}
