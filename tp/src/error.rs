//! Promotion error types

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while promoting a template
#[derive(Debug, Error)]
pub enum PromoteError {
    #[error("Version string must not be empty")]
    EmptyVersion,

    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Source file is not valid UTF-8 text: {}", .0.display())]
    SourceNotText(PathBuf),

    #[error("Source path has no file name: {}", .0.display())]
    InvalidSource(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    #[error("Cannot create destination directory {}: {source}", path.display())]
    DestinationUnavailable { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },
}

impl PromoteError {
    /// Classify an error raised while reading the source template
    pub fn from_read(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => PromoteError::SourceNotFound(path),
            io::ErrorKind::PermissionDenied => PromoteError::PermissionDenied(path),
            io::ErrorKind::InvalidData => PromoteError::SourceNotText(path),
            _ => PromoteError::ReadFailed { path, source: err },
        }
    }

    /// Check if this error came from a missing source file
    pub fn is_not_found(&self) -> bool {
        matches!(self, PromoteError::SourceNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_read_not_found() {
        let err = PromoteError::from_read(Path::new("a.txt"), io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Source file not found: a.txt");
    }

    #[test]
    fn test_from_read_permission_denied() {
        let err = PromoteError::from_read(Path::new("a.txt"), io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, PromoteError::PermissionDenied(_)));
    }

    #[test]
    fn test_from_read_invalid_data() {
        let err = PromoteError::from_read(Path::new("a.bin"), io::Error::from(io::ErrorKind::InvalidData));
        assert!(matches!(err, PromoteError::SourceNotText(_)));
    }

    #[test]
    fn test_from_read_other() {
        let err = PromoteError::from_read(Path::new("a.txt"), io::Error::other("boom"));
        assert!(matches!(err, PromoteError::ReadFailed { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_write_failed_message() {
        let err = PromoteError::WriteFailed {
            path: PathBuf::from("out/a.txt"),
            source: io::Error::other("disk full"),
        };
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Failed to write out/a.txt: disk full");
    }
}
