//! Error conversion utilities for CLI.
//!
//! Converts dirpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use dirpack_core::ArchiveError;
use std::path::Path;

/// Converts `ArchiveError` to a user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, target: &Path) -> anyhow::Error {
    match err {
        ArchiveError::Filesystem { path, source } => {
            anyhow!(
                "Cannot read source tree at '{}': {}\n\
                 HINT: Check that SOURCE is an existing, readable directory.",
                path.display(),
                source
            )
        }
        ArchiveError::ArchiveCreate { path, source } => {
            anyhow!(
                "Cannot create archive '{}': {}\n\
                 HINT: Check that the parent directory exists and is writable.",
                path.display(),
                source
            )
        }
        ArchiveError::EntryWrite {
            path,
            archive_path,
            source,
        } => {
            anyhow!(
                "Cannot add '{}' to '{}' as '{}': {}\n\
                 HINT: Use --skip-unreadable to leave unreadable files out, or -x to ignore them.",
                path.display(),
                target.display(),
                archive_path,
                source
            )
        }
        ArchiveError::ArchiveFinalize { path, source } => {
            anyhow!(
                "Cannot finish archive '{}': {}\n\
                 HINT: Check free disk space on the output device.",
                path.display(),
                source
            )
        }
        ArchiveError::InvalidPattern { pattern, source } => {
            anyhow!(
                "Invalid ignore pattern '{pattern}': {source}\n\
                 HINT: Patterns are globs relative to SOURCE, e.g. 'build/*' or '*.log'."
            )
        }
        ArchiveError::InvalidSubdirectory { prefix, reason } => {
            anyhow!(
                "Invalid subdirectory '{prefix}': {reason}\n\
                 HINT: Use a relative name such as 'my-plugin' or 'vendor/pkg'."
            )
        }
        ArchiveError::InvalidCompressionLevel { level } => {
            anyhow!(
                "Invalid compression level {level}\n\
                 HINT: Use 0 to store files uncompressed, or 1 (fastest) to 9 (smallest)."
            )
        }
    }
}

/// Adds context to an archiving result
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    target: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, target))
}
