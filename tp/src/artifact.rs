//! Artifact manifest
//!
//! Exposes promoted files to other build units. Each artifact is registered
//! under a category; consumers resolve a category back to a file and get an
//! error if that file has gone missing or changed since it was published.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while reading or writing the artifact manifest
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Invalid manifest {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("Failed to serialize manifest {}: {source}", path.display())]
    Serialize { path: PathBuf, source: serde_json::Error },

    #[error("No artifact published for category '{category}' (available: {available})")]
    CategoryNotFound { category: String, available: String },

    #[error("Artifact for category '{category}' is missing: {}", path.display())]
    Missing { category: String, path: PathBuf },

    #[error("Artifact for category '{category}' was modified after publishing: {}", path.display())]
    Modified { category: String, path: PathBuf },
}

impl ArtifactError {
    fn io(path: &Path, source: io::Error) -> Self {
        ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A published file and its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Classification attribute consumers select by
    pub category: String,
    /// Absolute location of the file
    pub path: PathBuf,
    /// Project version the file was produced for
    pub version: String,
    /// Hex SHA-256 of the file contents
    pub sha256: String,
    /// File size in bytes
    pub size: u64,
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

impl Artifact {
    /// Describe an existing file as an artifact of `category`
    ///
    /// The stored path is canonical so the manifest resolves from any
    /// working directory.
    pub fn describe(category: &str, path: impl AsRef<Path>, version: &str) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        debug!(category, path = %path.display(), "Artifact::describe: called");
        let bytes = fs::read(path).map_err(|e| ArtifactError::io(path, e))?;
        let absolute = fs::canonicalize(path).map_err(|e| ArtifactError::io(path, e))?;
        Ok(Self {
            category: category.to_string(),
            path: absolute,
            version: version.to_string(),
            sha256: sha256_hex(&bytes),
            size: bytes.len() as u64,
        })
    }

    /// Confirm the file still matches what was published
    pub fn verify(&self) -> Result<(), ArtifactError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ArtifactError::Missing {
                    category: self.category.clone(),
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(ArtifactError::io(&self.path, e)),
        };
        if sha256_hex(&bytes) != self.sha256 {
            return Err(ArtifactError::Modified {
                category: self.category.clone(),
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}

/// Set of published artifacts, one per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl ArtifactManifest {
    /// Load a manifest; a missing file is an empty manifest
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "ArtifactManifest::load: called");
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("ArtifactManifest::load: no manifest yet, starting empty");
                return Ok(Self::default());
            }
            Err(e) => return Err(ArtifactError::io(path, e)),
        };
        serde_json::from_str(&content).map_err(|e| ArtifactError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the manifest atomically, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        debug!(path = %path.display(), count = self.artifacts.len(), "ArtifactManifest::save: called");
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| ArtifactError::io(&dir, e))?;

        let mut json = serde_json::to_string_pretty(self).map_err(|e| ArtifactError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        json.push('\n');

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| ArtifactError::io(path, e))?;
        tmp.write_all(json.as_bytes()).map_err(|e| ArtifactError::io(path, e))?;
        tmp.persist(path).map_err(|e| ArtifactError::io(path, e.error))?;
        Ok(())
    }

    /// Register an artifact, replacing any previous one of the same category
    pub fn publish(&mut self, artifact: Artifact) {
        info!(
            category = %artifact.category,
            path = %artifact.path.display(),
            version = %artifact.version,
            "Published artifact"
        );
        self.artifacts.retain(|a| a.category != artifact.category);
        self.artifacts.push(artifact);
        self.artifacts.sort_by(|a, b| a.category.cmp(&b.category));
    }

    /// Look up the artifact for `category` and verify it is intact
    pub fn resolve(&self, category: &str) -> Result<&Artifact, ArtifactError> {
        debug!(category, "ArtifactManifest::resolve: called");
        let artifact = self
            .artifacts
            .iter()
            .find(|a| a.category == category)
            .ok_or_else(|| {
                let available: Vec<&str> = self.categories().collect();
                ArtifactError::CategoryNotFound {
                    category: category.to_string(),
                    available: if available.is_empty() {
                        "none".to_string()
                    } else {
                        available.join(", ")
                    },
                }
            })?;
        artifact.verify()?;
        Ok(artifact)
    }

    /// Published categories, sorted
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|a| a.category.as_str())
    }
}
