#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for xscan
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/xscan/config.toml)
//! - Environment variables (`XSCAN_*`)
//! - CLI flags (applied by the CLI itself)

pub mod constants;
pub mod sections;

pub use sections::{GeneralConfig, HarnessConfig, NetworkConfig, ServerConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use xscan_errors::{ConfigError, Error};
use xscan_types::ColorChoice;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub harness: HarnessConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("xscan").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        debug!(path = %path.display(), "loaded config file");
        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        use constants::{
            ENV_ACCESS_TOKEN, ENV_COLOR, ENV_PASSWORD, ENV_RETRIES, ENV_TESTS,
            ENV_TEST_RESOURCES, ENV_TIMEOUT, ENV_URL, ENV_USER,
        };

        if let Ok(url) = std::env::var(ENV_URL) {
            self.server.url = Some(url);
        }
        if let Ok(token) = std::env::var(ENV_ACCESS_TOKEN) {
            self.server.access_token = Some(token);
        }
        if let Ok(user) = std::env::var(ENV_USER) {
            self.server.user = Some(user);
        }
        if let Ok(password) = std::env::var(ENV_PASSWORD) {
            self.server.password = Some(password);
        }

        if let Ok(color) = std::env::var(ENV_COLOR) {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_COLOR.to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        if let Ok(timeout) = std::env::var(ENV_TIMEOUT) {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_TIMEOUT.to_string(),
                value: timeout,
            })?;
        }

        if let Ok(retries) = std::env::var(ENV_RETRIES) {
            self.network.retries = retries.parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_RETRIES.to_string(),
                value: retries,
            })?;
        }

        if let Ok(enabled) = std::env::var(ENV_TESTS) {
            self.harness.enabled = match enabled.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_TESTS.to_string(),
                        value: enabled,
                    }
                    .into())
                }
            };
        }

        if let Ok(resources) = std::env::var(ENV_TEST_RESOURCES) {
            self.harness.resources_path = Some(PathBuf::from(resources));
        }

        Ok(())
    }

    /// Get the fixture resources path (with default)
    #[must_use]
    pub fn resources_path(&self) -> PathBuf {
        self.harness
            .resources_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("testdata"))
    }

    /// Directory for debug log files
    #[must_use]
    pub fn logs_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("xscan")
            .join("logs")
    }
}
