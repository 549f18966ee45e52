//! Host configuration with TOML file support.

use proposalnet_governance::GovernanceParams;
use proposalnet_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the `proposalnet` host.
///
/// Can be loaded from a TOML file via [`DaemonConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Where the engine snapshot is kept between calls.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Average block interval, only used to describe voting windows in logs.
    #[serde(default = "default_block_time_secs")]
    pub block_time_secs: u64,

    /// Limits applied to new proposals.
    #[serde(default)]
    pub governance: GovernanceParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_state_file() -> PathBuf {
    PathBuf::from("./proposalnet_state.bin")
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_block_time_secs() -> u64 {
    600
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Reject limits that would make every proposal invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.governance.max_description_len == 0 {
            return Err(ConfigError::Invalid(
                "governance.max_description_len must be positive".into(),
            ));
        }
        if self.governance.max_voting_duration == Some(0) {
            return Err(ConfigError::Invalid(
                "governance.max_voting_duration must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            block_time_secs: default_block_time_secs(),
            governance: GovernanceParams::default(),
        }
    }
}
