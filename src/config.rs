//! Configuration for the triage engine
//!
//! Loaded from TOML, validated, then optionally overridden from the
//! environment. Every section has defaults so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding `snapshots.directory`
pub const SNAPSHOT_DIR_ENV: &str = "TRIAGE_SNAPSHOT_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub harness: HarnessConfig,
    pub snapshots: SnapshotConfig,
    pub naive_bayes: NaiveBayesConfig,
    pub affinity: AffinityConfig,
}

/// Cross-validation harness settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// How many ranked candidates count toward a hit
    pub shortlist_size: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self { shortlist_size: 5 }
    }
}

/// Recovery snapshot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub enabled: bool,
    pub directory: PathBuf,
    /// Artifact name prefix; iteration number and `.model` are appended
    pub prefix: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("./data/caches"),
            prefix: "incremental".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    /// Laplace smoothing constant
    pub smoothing: f64,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self { smoothing: 1.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityConfig {
    /// Weight of the contribution-share term
    pub activity_weight: f64,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self {
            activity_weight: 0.5,
        }
    }
}

impl TriageConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: TriageConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of file/default values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = env::var(SNAPSHOT_DIR_ENV) {
            if !dir.is_empty() {
                debug!("Using snapshot directory from {}", SNAPSHOT_DIR_ENV);
                self.snapshots.directory = PathBuf::from(dir);
            }
        }
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.harness.shortlist_size == 0 || self.harness.shortlist_size > 50 {
            return Err(ConfigError::ValidationError(
                "harness: shortlist_size must be between 1 and 50".to_string(),
            ));
        }

        if self.snapshots.enabled && self.snapshots.prefix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "snapshots: prefix must not be empty".to_string(),
            ));
        }

        let smoothing = self.naive_bayes.smoothing;
        if !smoothing.is_finite() || smoothing <= 0.0 {
            return Err(ConfigError::ValidationError(
                "naive_bayes: smoothing must be positive".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.affinity.activity_weight) {
            return Err(ConfigError::ValidationError(
                "affinity: activity_weight must be between 0 and 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}
