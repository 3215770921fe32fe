//! Error types for directory archiving operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while packaging a directory tree.
///
/// Every variant carries a stable code (see [`ArchiveError::code`]) so
/// collaborators can classify failures without matching on message text.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The source tree could not be read (missing root, unreadable
    /// directory, entry vanished mid-walk).
    #[error("cannot read source tree at {path}: {source}")]
    Filesystem {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The destination archive could not be opened or created.
    #[error("cannot create archive {path}: {source}")]
    ArchiveCreate {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A single file could not be read or written into the archive.
    #[error("cannot add {path} to archive as '{archive_path}': {source}")]
    EntryWrite {
        /// Source file path.
        path: PathBuf,
        /// Archive-internal path the file was mapped to (may be empty when
        /// the mapping itself failed).
        archive_path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The central directory could not be written.
    #[error("cannot finalize archive {path}: {source}")]
    ArchiveFinalize {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An ignore pattern is not a valid glob.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Glob compilation error.
        #[source]
        source: globset::Error,
    },

    /// The subdirectory prefix is not a usable archive path.
    #[error("invalid subdirectory prefix '{prefix}': {reason}")]
    InvalidSubdirectory {
        /// The offending prefix.
        prefix: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Compression level outside `0..=9`.
    #[error("invalid compression level {level}: must be 0-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },
}

impl ArchiveError {
    /// Returns the stable error code for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::ArchiveError;
    ///
    /// let err = ArchiveError::InvalidCompressionLevel { level: 12 };
    /// assert_eq!(err.code(), "INVALID_COMPRESSION_LEVEL");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Filesystem { .. } => "FILESYSTEM_ERROR",
            Self::ArchiveCreate { .. } => "ARCHIVE_CREATE_ERROR",
            Self::EntryWrite { .. } => "ENTRY_WRITE_ERROR",
            Self::ArchiveFinalize { .. } => "ARCHIVE_FINALIZE_ERROR",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::InvalidSubdirectory { .. } => "INVALID_SUBDIRECTORY",
            Self::InvalidCompressionLevel { .. } => "INVALID_COMPRESSION_LEVEL",
        }
    }

    /// Returns `true` if the error comes from invalid configuration and was
    /// raised before any filesystem access.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::ArchiveError;
    ///
    /// let err = ArchiveError::InvalidSubdirectory {
    ///     prefix: "../up".to_string(),
    ///     reason: "segments must not be '.' or '..'",
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. }
                | Self::InvalidSubdirectory { .. }
                | Self::InvalidCompressionLevel { .. }
        )
    }

    /// Returns `true` if the error concerns a single entry, which the
    /// [`FailurePolicy::SkipEntry`](crate::FailurePolicy::SkipEntry) policy
    /// may tolerate.
    #[must_use]
    pub const fn is_entry_error(&self) -> bool {
        matches!(self, Self::EntryWrite { .. })
    }

    pub(crate) fn entry_write(
        path: impl Into<PathBuf>,
        archive_path: impl Into<String>,
        source: io::Error,
    ) -> Self {
        Self::EntryWrite {
            path: path.into(),
            archive_path: archive_path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_codes_are_distinct() {
        let glob_err = globset::GlobBuilder::new("[").build().unwrap_err();
        let errors = [
            ArchiveError::Filesystem {
                path: PathBuf::from("src"),
                source: io::Error::other("gone"),
            },
            ArchiveError::ArchiveCreate {
                path: PathBuf::from("out.zip"),
                source: io::Error::other("denied"),
            },
            ArchiveError::entry_write("a.txt", "a.txt", io::Error::other("eof")),
            ArchiveError::ArchiveFinalize {
                path: PathBuf::from("out.zip"),
                source: io::Error::other("disk full"),
            },
            ArchiveError::InvalidPattern {
                pattern: "[".to_string(),
                source: glob_err,
            },
            ArchiveError::InvalidSubdirectory {
                prefix: String::new(),
                reason: "must not be empty",
            },
            ArchiveError::InvalidCompressionLevel { level: 10 },
        ];

        let mut codes: Vec<_> = errors.iter().map(ArchiveError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_entry_write_display_names_both_paths() {
        let err = ArchiveError::entry_write(
            "/src/a.txt",
            "dist/a.txt",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/src/a.txt"));
        assert!(msg.contains("dist/a.txt"));
        assert!(err.is_entry_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let glob_err = globset::GlobBuilder::new("[").build().unwrap_err();
        let err = ArchiveError::InvalidPattern {
            pattern: "[".to_string(),
            source: glob_err,
        };
        assert!(err.is_config_error());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("'['"));
    }
}
