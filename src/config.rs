//! Configuration management for the stroke predictor

use crate::models::loader::DEFAULT_ARTIFACT_PATH;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file read when no `--config` is given; may be absent
pub const DEFAULT_CONFIG_PATH: &str = "config/predict.toml";

/// Prefix of environment variable overrides, e.g. `STROKE_PREDICT__ARTIFACTS__PATH`
pub const ENV_PREFIX: &str = "STROKE_PREDICT";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub logging: LoggingConfig,
}

/// Artifact bundle configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtifactsConfig {
    /// Path of the JSON bundle written by the training step
    pub path: PathBuf,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json)
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the default file, if it exists
    pub fn load() -> Result<Self> {
        Self::from_sources(Path::new(DEFAULT_CONFIG_PATH), false)
    }

    /// Load configuration from a specific path, which must exist
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_sources(path.as_ref(), true)
    }

    /// Layer defaults, the config file and environment overrides
    fn from_sources(path: &Path, required: bool) -> Result<Self> {
        let config = Config::builder()
            .set_default("artifacts.path", DEFAULT_ARTIFACT_PATH)?
            .set_default("logging.level", "warn")?
            .set_default("logging.format", "pretty")?
            .add_source(File::from(path).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to build configuration from {}", path.display()))?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Replace the artifact path, e.g. from the command line
    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifacts.path = path.into();
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactsConfig {
                path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}
