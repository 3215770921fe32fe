//! Archiving operation reporting.

use std::time::Duration;

/// Report of a completed archiving operation.
///
/// # Examples
///
/// ```
/// use dirpack_core::ArchiveReport;
///
/// let mut report = ArchiveReport::default();
/// report.bytes_written = 1024;
/// report.archive_size = 256;
///
/// assert_eq!(report.compression_ratio(), 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveReport {
    /// Number of files written into the archive.
    pub files_added: usize,

    /// Number of directories traversed (never archived themselves).
    pub directories_traversed: usize,

    /// Number of entries left out: non-regular files, and files that failed
    /// under [`FailurePolicy::SkipEntry`](crate::FailurePolicy::SkipEntry).
    pub entries_skipped: usize,

    /// Total uncompressed bytes read from source files.
    pub bytes_written: u64,

    /// Size of the finished archive file in bytes.
    pub archive_size: u64,

    /// Archive-internal paths in the order they were written.
    pub entries: Vec<String>,

    /// Duration of the operation.
    pub duration: Duration,

    /// Warnings generated while archiving.
    pub warnings: Vec<String>,
}

impl ArchiveReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (uncompressed / archive size).
    ///
    /// Returns 0.0 if either value is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.archive_size as f64
    }
}
