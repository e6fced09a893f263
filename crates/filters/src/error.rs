use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error produced while reading or parsing a filter configuration source.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A line in the configuration could not be parsed.
    #[error("{}: line {line}: {message}", .path.display())]
    Parse {
        /// Path (or inline label) of the offending source.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Human-readable description of the problem.
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Returns the line number where the error occurred, if available.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::Parse { line, .. } => Some(*line),
        }
    }

    /// Returns the path of the source that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

/// Entity name or predefined type that a configuration file cannot carry.
///
/// Raised when restoring an [`ObjectFilter`](crate::ObjectFilter) from JSON
/// whose keys are blank, contain `=` or a line break, or start with a comment
/// or section marker.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("entry {0:?} cannot be stored in an entity table")]
pub struct InvalidEntryError(pub(crate) String);

/// Error produced while persisting or restoring a [`FilterSet`](crate::FilterSet).
#[derive(Debug, Error)]
pub enum SerializeError {
    /// JSON encoding or decoding failed.
    #[error("invalid filter set JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading or writing the persisted file failed.
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Error returned by [`FilterSet::load`](crate::FilterSet::load) and friends.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A sectioned configuration source failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A serialized filter set failed to load.
    #[error(transparent)]
    Serialized(#[from] SerializeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn parse_error_reports_path_and_line() {
        let error = ConfigError::parse(Path::new("filters.conf"), 7, "expected 'key = value'");
        assert_eq!(error.line(), Some(7));
        assert_eq!(error.path(), Path::new("filters.conf"));
        assert_eq!(
            error.to_string(),
            "filters.conf: line 7: expected 'key = value'"
        );
    }

    #[test]
    fn io_error_preserves_source() {
        let error = ConfigError::io(
            Path::new("missing.conf"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(error.line(), None);
        assert!(error.to_string().starts_with("failed to read 'missing.conf'"));
        assert_eq!(error.source().unwrap().to_string(), "gone");
    }

    #[test]
    fn load_error_is_transparent() {
        let inner = ConfigError::parse(Path::new("<inline>"), 1, "bad");
        let expected = inner.to_string();
        let error = LoadError::from(inner);
        assert_eq!(error.to_string(), expected);
    }
}
