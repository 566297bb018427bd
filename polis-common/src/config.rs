//! Configuration loading for the report tooling
//!
//! Settings sources, highest priority first:
//!
//! 1. Command-line arguments (`--api-base-url`, `--config`)
//! 2. Environment variables (`POLIS_API_BASE_URL`, `POLIS_CONFIG`)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! A missing TOML file is not an error: a warning is logged and defaults are
//! used. A file that exists but does not parse is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable overriding the API base URL
pub const ENV_API_BASE_URL: &str = "POLIS_API_BASE_URL";

/// Environment variable pointing at a TOML config file
pub const ENV_CONFIG_PATH: &str = "POLIS_CONFIG";

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportConfig {
    /// Backend API origin, without trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Total per-request timeout applied by the HTTP source
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    format!("polis-report/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ReportConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve the effective configuration
    ///
    /// `cli_config` and `cli_base_url` come from command-line arguments and
    /// win over every other source.
    pub fn resolve(cli_config: Option<&Path>, cli_base_url: Option<&str>) -> Result<Self> {
        Self::resolve_with_origin(cli_config, cli_base_url).map(|(config, _)| config)
    }

    /// Like [`ReportConfig::resolve`], also reporting which file was used
    ///
    /// Nothing is logged here; callers log the origin once their tracing
    /// subscriber is installed.
    pub fn resolve_with_origin(
        cli_config: Option<&Path>,
        cli_base_url: Option<&str>,
    ) -> Result<(Self, ConfigOrigin)> {
        let (mut config, origin) = match config_file_path(cli_config) {
            Some(path) if path.exists() => {
                let config = Self::from_file(&path)?;
                (config, ConfigOrigin::File(path))
            }
            Some(path) => {
                if cli_config.is_some() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                (Self::default(), ConfigOrigin::Missing(path))
            }
            None => (Self::default(), ConfigOrigin::Defaults),
        };

        if let Ok(url) = std::env::var(ENV_API_BASE_URL) {
            if !url.is_empty() {
                config.api_base_url = url;
            }
        }

        if let Some(url) = cli_base_url {
            config.api_base_url = url.to_string();
        }

        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok((config, origin))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(Error::Config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the TOML layer of a resolved configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Loaded from this file
    File(PathBuf),
    /// Expected at this path but absent; built-in defaults used
    Missing(PathBuf),
    /// No config location could be determined
    Defaults,
}

impl ConfigOrigin {
    /// Log the origin (warns when the expected file was missing)
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => {
                info!("Loaded configuration from {}", path.display());
            }
            ConfigOrigin::Missing(path) => {
                warn!(
                    "Config file {} not found, using built-in defaults",
                    path.display()
                );
            }
            ConfigOrigin::Defaults => {
                warn!("No config directory available, using built-in defaults");
            }
        }
    }
}

/// Pick the TOML file to read: CLI → env → platform config dir
fn config_file_path(cli_config: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_config {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("polis").join("report.toml"))
}
