//! Project version resolution
//!
//! The version comes from, in order: an explicit value, the `TP_VERSION`
//! environment variable, the config file, or a key in a properties file
//! (`gradle.properties` by default).

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors that can occur while resolving the project version
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("No project version found (looked for key '{key}' in {})", file.display())]
    NotFound { key: String, file: PathBuf },

    #[error("Project version from {0} is empty")]
    Empty(&'static str),

    #[error("Failed to read properties file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Candidate sources for the project version, highest priority first
#[derive(Debug, Clone, Default)]
pub struct VersionSources {
    /// Value passed on the command line
    pub explicit: Option<String>,
    /// Value of the version environment variable
    pub env: Option<String>,
    /// Value from the config file
    pub config: Option<String>,
    /// Properties file to fall back to
    pub properties_file: PathBuf,
    /// Key looked up in the properties file
    pub properties_key: String,
}

/// Join physical lines ending in an odd number of backslashes with the next one
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;

    for raw in content.lines() {
        let line = match current.take() {
            Some(mut acc) => {
                acc.push_str(raw.trim_start());
                acc
            }
            None => {
                let trimmed = raw.trim_start();
                if trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_string()
            }
        };

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            current = Some(line[..line.len() - 1].to_string());
        } else {
            lines.push(line);
        }
    }
    lines.extend(current);
    lines
}

/// Parse properties-file content
///
/// The key ends at the first `=`, `:` or whitespace; one `=`/`:` after any
/// whitespace is skipped. Blank lines and `#`/`!` comments are ignored.
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    logical_lines(content)
        .iter()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let end = line
                .find(|c: char| c == '=' || c == ':' || c.is_whitespace())
                .unwrap_or(line.len());
            let key = &line[..end];
            if key.is_empty() {
                return None;
            }
            let rest = line[end..].trim_start();
            let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
            Some((key.to_string(), rest.trim().to_string()))
        })
        .collect()
}

fn read_property(path: &Path, key: &str) -> Result<Option<String>, VersionError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "read_property: properties file not found");
            return Ok(None);
        }
        Err(e) => {
            return Err(VersionError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    Ok(parse_properties(&content).remove(key))
}

/// Resolve the project version from the first source that provides one
pub fn resolve_version(sources: &VersionSources) -> Result<String, VersionError> {
    debug!(?sources, "resolve_version: called");
    let candidates = [
        ("command line", sources.explicit.as_ref()),
        ("environment", sources.env.as_ref()),
        ("config file", sources.config.as_ref()),
    ];

    for (origin, value) in candidates {
        if let Some(v) = value {
            debug!(origin, version = %v, "resolve_version: found");
            return non_empty(v.clone(), origin);
        }
    }

    match read_property(&sources.properties_file, &sources.properties_key)? {
        Some(v) => {
            debug!(version = %v, "resolve_version: found in properties file");
            non_empty(v, "properties file")
        }
        None => Err(VersionError::NotFound {
            key: sources.properties_key.clone(),
            file: sources.properties_file.clone(),
        }),
    }
}

fn non_empty(version: String, origin: &'static str) -> Result<String, VersionError> {
    if version.is_empty() {
        return Err(VersionError::Empty(origin));
    }
    Ok(version)
}
