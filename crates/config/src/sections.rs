//! Configuration sections and their defaults

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use xscan_types::ColorChoice;

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
        }
    }
}

/// Scan service location and credentials
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub access_token: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "***");
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("access_token", &redact(&self.access_token))
            .field("user", &self.user)
            .field("password", &redact(&self.password))
            .finish()
    }
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64, // seconds
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: 300, // 5 minutes
            connect_timeout: 30,
            retries: 3,
            retry_delay: 1, // 1 second
        }
    }
}

/// Verification harness configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HarnessConfig {
    #[serde(default)]
    pub enabled: bool,
    pub resources_path: Option<PathBuf>,
}

// Default value functions for serde
fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    1 // 1 second
}
