//! Application configuration
//!
//! Configuration loaded from `.unidux.toml` (or the user config directory).

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Demo configuration loaded from `.unidux.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Delay before a deferred "increment async" is dispatched
    #[serde(default = "default_async_delay_ms")]
    pub async_delay_ms: u64,

    /// How often the event loop polls for input and due deferred actions
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Visibility filter the todo list starts with
    #[serde(default = "default_initial_filter")]
    pub initial_filter: String,
}

fn default_async_delay_ms() -> u64 {
    3000
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_initial_filter() -> String {
    "SHOW_ALL".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            async_delay_ms: default_async_delay_ms(),
            tick_rate_ms: default_tick_rate_ms(),
            log_level: default_log_level(),
            initial_filter: default_initial_filter(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then the config directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::from_toml(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {:#}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Load config from an explicit path; errors are not swallowed
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = crate::read_config_file(path)?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    pub fn async_delay(&self) -> Duration {
        Duration::from_millis(self.async_delay_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    /// Parsed log level, falling back to debug for unknown values
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.async_delay(), Duration::from_secs(3));
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
        assert_eq!(config.log_level_filter(), LevelFilter::Debug);
        assert_eq!(config.initial_filter, "SHOW_ALL");
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            async_delay_ms = 500
            log_level = "warn"
        "#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.async_delay_ms, 500);
        assert_eq!(config.log_level_filter(), LevelFilter::Warn);
        // unspecified fields use defaults
        assert_eq!(config.tick_rate_ms, 100);
        assert_eq!(config.initial_filter, "SHOW_ALL");
    }

    #[test]
    fn test_invalid_values() {
        assert!(AppConfig::from_toml("async_delay_ms = \"soon\"").is_err());

        let config = AppConfig::from_toml("log_level = \"loud\"\ntick_rate_ms = 0").unwrap();
        assert_eq!(config.log_level_filter(), LevelFilter::Debug);
        assert_eq!(config.tick_rate(), Duration::from_millis(1));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = AppConfig::load_from(Path::new("/nonexistent/unidux/config.toml"));
        assert!(result.is_err());
    }
}
