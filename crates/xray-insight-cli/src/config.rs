//! XRay Insight CLI Configuration Management
//!
//! Configuration is layered with figment, lowest priority first:
//! - Default values
//! - `xray.toml` in the working directory
//! - `~/.xray/config.toml`
//! - Environment variables (`XRAY_*`, nested keys separated by `__`,
//!   e.g. `XRAY_CORE__SESSION__AUTH_LATENCY_MS=0`)
//!
//! An explicit `--config FILE` replaces the two file layers.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use xray_insight_core::XrayConfig;

const CONFIG_FILE: &str = "xray.toml";
const ENV_PREFIX: &str = "XRAY_";
const APP_DIR: &str = ".xray";

// ----------------------------------------------------------------------------
// CLI Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the `xray` binary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliAppConfig {
    /// Session store and analyzer configuration
    pub core: XrayConfig,

    /// Terminal presentation
    pub cli: CliConfig,

    /// Where client storage lives on disk
    pub state: StateConfig,
}

/// CLI-specific configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Enable verbose logging output
    pub verbose: bool,

    /// Prompt shown by the interactive shell
    pub prompt: String,

    /// Whether to use colored output
    pub colored_output: bool,
}

/// State persistence configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Directory holding `client_storage.json` (defaults to `~/.xray`)
    pub state_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            prompt: "xray> ".to_string(),
            colored_output: true,
        }
    }
}

// ----------------------------------------------------------------------------
// Configuration Loading Logic
// ----------------------------------------------------------------------------

impl CliAppConfig {
    /// Load configuration with the standard priority order
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE));

        if let Some(path) = Self::default_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file path, still honoring `XRAY_*`
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileSystem(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: CliAppConfig = figment
            .extract()
            .map_err(|e| ConfigError::Loading(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// `~/.xray/config.toml`, when a home directory is known
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(APP_DIR).join("config.toml"))
    }

    /// Directory for persisted client state
    pub fn state_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.state.state_dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(APP_DIR))
            .ok_or_else(|| {
                ConfigError::Environment(
                    "No home directory; pass --data-dir to choose a state directory".to_string(),
                )
            })
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.core
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.cli.prompt.is_empty() {
            return Err(ConfigError::Validation(
                "Shell prompt must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Create example configuration file content
    pub fn example_config() -> String {
        let example_config = CliAppConfig {
            state: StateConfig {
                state_dir: Some(PathBuf::from("/var/lib/xray")),
            },
            ..Default::default()
        };

        toml::to_string_pretty(&example_config)
            .unwrap_or_else(|_| "# Failed to generate example config".to_string())
    }
}

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {0}")]
    Loading(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("File system error: {0}")]
    FileSystem(String),
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
