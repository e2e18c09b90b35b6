//! Gateway configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (HAVEN_*)
//! 2. TOML config file (if HAVEN_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! Only deployment concerns live here. The cache policy table, the release
//! tag, and the precache manifest are compile-time constants and have no
//! configuration surface.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Gateway configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (HAVEN_*)
/// 2. TOML config file (if HAVEN_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Socket address the gateway listens on.
    ///
    /// Set via HAVEN_LISTEN_ADDR environment variable.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Upstream origin URL all intercepted request paths resolve against.
    ///
    /// Set via HAVEN_UPSTREAM environment variable. Required at startup.
    #[serde(default)]
    pub upstream: Option<String>,

    /// Path to the SQLite cache database.
    ///
    /// Set via HAVEN_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for upstream requests.
    ///
    /// Set via HAVEN_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8737".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./haven-cache.sqlite")
}

fn default_user_agent() -> String {
    concat!("haven/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            upstream: None,
            db_path: default_db_path(),
            user_agent: default_user_agent(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `HAVEN_`
    /// 2. TOML file from `HAVEN_CONFIG_FILE` (if set)
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

        if let Ok(config_path) = std::env::var("HAVEN_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("HAVEN_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Get the upstream origin, which is required to start serving.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no upstream is configured.
    pub fn require_upstream(&self) -> Result<&str, ConfigError> {
        self.upstream.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "upstream".into(),
            hint: "Set HAVEN_UPSTREAM environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.listen_addr, "127.0.0.1:8737");
        assert_eq!(config.db_path, PathBuf::from("./haven-cache.sqlite"));
        assert!(config.user_agent.starts_with("haven/"));
        assert!(config.upstream.is_none());
    }

    #[test]
    fn test_require_upstream_missing() {
        let config = GatewayConfig::default();
        let result = config.require_upstream();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_upstream_present() {
        let config = GatewayConfig { upstream: Some("https://app.example".into()), ..Default::default() };
        assert_eq!(config.require_upstream().unwrap(), "https://app.example");
    }
}
