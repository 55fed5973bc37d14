//! Centralized Configuration Management
//!
//! Configuration structures shared by every composition root (CLI, web).

use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::{XrayError, Result};

/// Storage key the browser client has always used for the current identity
pub const DEFAULT_STORAGE_KEY: &str = "user";

// ----------------------------------------------------------------------------
// Session Configuration
// ----------------------------------------------------------------------------

/// Configuration for the session store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Client storage key holding the serialized identity
    pub storage_key: String,
    /// Simulated backend latency for sign-in and sign-up (milliseconds)
    pub auth_latency_ms: u64,
    /// Accept sign-in for unknown emails by registering them on the fly
    pub auto_register_unknown: bool,
    /// Seed the directory with the demo identity
    pub seed_demo_identity: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            auth_latency_ms: 1000,
            auto_register_unknown: true,
            seed_demo_identity: true,
        }
    }
}

impl SessionConfig {
    /// Configuration with no simulated latency, for tests
    pub fn instant() -> Self {
        Self {
            auth_latency_ms: 0,
            ..Self::default()
        }
    }

    /// Simulated latency as a duration
    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }
}

// ----------------------------------------------------------------------------
// Analysis Configuration
// ----------------------------------------------------------------------------

/// Configuration for the mock analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Simulated inference latency (milliseconds)
    pub latency_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { latency_ms: 2000 }
    }
}

impl AnalysisConfig {
    /// Simulated latency as a duration
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

// ----------------------------------------------------------------------------
// Top-level Configuration
// ----------------------------------------------------------------------------

/// Complete core configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XrayConfig {
    pub session: SessionConfig,
    pub analysis: AnalysisConfig,
}

impl XrayConfig {
    /// Configuration with every simulated delay removed
    pub fn testing() -> Self {
        Self {
            session: SessionConfig::instant(),
            analysis: AnalysisConfig { latency_ms: 0 },
        }
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.session.storage_key.trim().is_empty() {
            return Err(XrayError::config_error("Storage key must not be empty"));
        }
        // Anything past a minute is a typo, not a latency simulation
        const MAX_LATENCY_MS: u64 = 60_000;
        if self.session.auth_latency_ms > MAX_LATENCY_MS {
            return Err(XrayError::config_error(format!(
                "Auth latency {}ms exceeds {}ms",
                self.session.auth_latency_ms, MAX_LATENCY_MS
            )));
        }
        if self.analysis.latency_ms > MAX_LATENCY_MS {
            return Err(XrayError::config_error(format!(
                "Analysis latency {}ms exceeds {}ms",
                self.analysis.latency_ms, MAX_LATENCY_MS
            )));
        }
        Ok(())
    }
}
