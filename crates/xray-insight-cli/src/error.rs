//! Error handling for the XRay Insight CLI

use thiserror::Error;

use crate::config::ConfigError;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] xray_insight_core::XrayError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Whether the user has already seen this error as a notice
    pub fn is_notified(&self) -> bool {
        matches!(
            self,
            CliError::Core(xray_insight_core::XrayError::Auth(_))
                | CliError::Core(xray_insight_core::XrayError::Analysis(_))
        )
    }
}
