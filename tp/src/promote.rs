//! Template promotion
//!
//! Reads a template, replaces every `<<version>>` placeholder with the project
//! version and writes the result to `<into>/<template file name>`. The output
//! is written to a temporary file in the destination directory and renamed
//! into place, so a failed run never leaves a truncated file behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::PLACEHOLDER;
use crate::error::PromoteError;

/// Replace every occurrence of the placeholder with `version`
pub fn substitute(text: &str, version: &str) -> String {
    text.replace(PLACEHOLDER, version)
}

/// Number of placeholders in `text`
pub fn count_placeholders(text: &str) -> usize {
    text.matches(PLACEHOLDER).count()
}

/// Result of a successful promotion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoteOutcome {
    /// Path of the promoted file
    pub output: PathBuf,
    /// Number of placeholders replaced
    pub replacements: usize,
    /// Size of the written file in bytes
    pub bytes: usize,
    /// The previous output already had identical content
    pub unchanged: bool,
}

/// State of an existing promoted file relative to its template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Output matches the rendered template
    UpToDate,
    /// Output exists but differs
    Stale,
    /// Output does not exist
    Missing,
}

impl CheckStatus {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, CheckStatus::UpToDate)
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CheckStatus::UpToDate => "up to date",
            CheckStatus::Stale => "stale",
            CheckStatus::Missing => "missing",
        };
        write!(f, "{}", s)
    }
}

/// A single template promotion: source file, destination directory, version
#[derive(Debug, Clone)]
pub struct Promotion {
    /// Template file to read
    pub source: PathBuf,
    /// Directory the promoted copy is written to
    pub into: PathBuf,
    /// Version substituted for the placeholder
    pub version: String,
}

impl Promotion {
    pub fn new(source: impl Into<PathBuf>, into: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            into: into.into(),
            version: version.into(),
        }
    }

    /// Path the promoted file is written to
    pub fn output_path(&self) -> Result<PathBuf, PromoteError> {
        let name = self
            .source
            .file_name()
            .ok_or_else(|| PromoteError::InvalidSource(self.source.clone()))?;
        Ok(self.into.join(name))
    }

    /// Render the template without writing anything
    pub fn render(&self) -> Result<String, PromoteError> {
        debug!(source = %self.source.display(), version = %self.version, "Promotion::render: called");
        if self.version.is_empty() {
            return Err(PromoteError::EmptyVersion);
        }
        let text = fs::read_to_string(&self.source).map_err(|e| PromoteError::from_read(&self.source, e))?;
        Ok(substitute(&text, &self.version))
    }

    /// Promote the template into the destination directory
    pub fn run(&self) -> Result<PromoteOutcome, PromoteError> {
        debug!(
            source = %self.source.display(),
            into = %self.into.display(),
            version = %self.version,
            "Promotion::run: called"
        );
        let output = self.output_path()?;
        if self.version.is_empty() {
            return Err(PromoteError::EmptyVersion);
        }

        // Read before touching the destination so a bad source creates nothing
        let text = fs::read_to_string(&self.source).map_err(|e| PromoteError::from_read(&self.source, e))?;
        let replacements = count_placeholders(&text);
        let rendered = substitute(&text, &self.version);

        // An unreadable previous output only affects the report; the write below replaces it
        let unchanged = match fs::read(&output) {
            Ok(existing) => existing == rendered.as_bytes(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                debug!(output = %output.display(), error = %e, "Promotion::run: previous output unreadable");
                false
            }
        };

        fs::create_dir_all(&self.into).map_err(|e| PromoteError::DestinationUnavailable {
            path: self.into.clone(),
            source: e,
        })?;

        self.write_atomic(&output, rendered.as_bytes())?;

        info!(
            output = %output.display(),
            replacements,
            unchanged,
            "Promoted template"
        );
        Ok(PromoteOutcome {
            output,
            replacements,
            bytes: rendered.len(),
            unchanged,
        })
    }

    /// Compare the current output against the rendered template
    pub fn check(&self) -> Result<CheckStatus, PromoteError> {
        debug!(source = %self.source.display(), "Promotion::check: called");
        let output = self.output_path()?;
        let rendered = self.render()?;

        let status = match fs::read(&output) {
            Ok(existing) if existing == rendered.as_bytes() => CheckStatus::UpToDate,
            Ok(_) => CheckStatus::Stale,
            Err(e) if e.kind() == io::ErrorKind::NotFound => CheckStatus::Missing,
            Err(e) => {
                return Err(PromoteError::ReadFailed {
                    path: output,
                    source: e,
                });
            }
        };
        debug!(output = %output.display(), %status, "Promotion::check: done");
        Ok(status)
    }

    fn write_atomic(&self, output: &Path, contents: &[u8]) -> Result<(), PromoteError> {
        let write_failed = |source: io::Error| PromoteError::WriteFailed {
            path: output.to_path_buf(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.into).map_err(write_failed)?;
        tmp.write_all(contents).map_err(write_failed)?;
        tmp.as_file().sync_all().map_err(write_failed)?;

        // Carry the template's mode over, like a plain copy would
        if let Ok(meta) = fs::metadata(&self.source) {
            fs::set_permissions(tmp.path(), meta.permissions()).map_err(write_failed)?;
        }

        tmp.persist(output).map_err(|e| write_failed(e.error))?;
        Ok(())
    }
}
