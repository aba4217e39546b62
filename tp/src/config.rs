//! TemplatePromoter configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Template promotion settings
    pub promotion: PromotionConfig,

    /// Artifact publishing settings
    pub publish: PublishConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(p) => p.clone(),
            None => Self::default_paths().into_iter().find(|p| p.exists())?,
        };
        Self::load_from_file(&path).ok()?.log_level
    }

    /// Project-local `.promote.yml`, then `<config dir>/templatepromoter/promote.yml`
    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".promote.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("templatepromoter").join("promote.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::debug!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Template promotion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionConfig {
    /// Template file to promote
    pub source: Option<PathBuf>,

    /// Directory the promoted copy is written to
    pub into: PathBuf,

    /// Fixed project version (overrides the properties file)
    pub version: Option<String>,

    /// Properties file holding the project version
    #[serde(rename = "version-file")]
    pub version_file: PathBuf,

    /// Key of the version entry in the properties file
    #[serde(rename = "version-key")]
    pub version_key: String,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            source: None,
            into: PathBuf::from(crate::DEFAULT_INTO),
            version: None,
            version_file: PathBuf::from("gradle.properties"),
            version_key: "version".to_string(),
        }
    }
}

/// Artifact publishing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Category the promoted file is published under
    pub category: String,

    /// Manifest file listing published artifacts
    pub manifest: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            category: crate::DEFAULT_CATEGORY.to_string(),
            manifest: PathBuf::from(crate::DEFAULT_MANIFEST),
        }
    }
}
