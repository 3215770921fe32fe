//! Configuration for directory archiving operations.

use crate::ArchiveError;
use crate::Result;

/// Modification time written into every entry in reproducible mode, in
/// seconds since the Unix epoch (2017-07-14T02:40:00Z).
pub const REPRODUCIBLE_MTIME: i64 = 1_500_000_000;

/// How reproducible mode pins entry modification times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MtimePolicy {
    /// Set the source file's modification time on disk to
    /// [`REPRODUCIBLE_MTIME`] before reading it.
    ///
    /// This mutates the source tree and cannot be undone. Concurrent readers
    /// of the tree may observe either the original or the normalized time.
    #[default]
    TouchSource,

    /// Write [`REPRODUCIBLE_MTIME`] into the entry header only. The source
    /// tree is left untouched.
    ArchiveOnly,
}

/// What to do when a single file cannot be archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole operation and remove the partial archive.
    #[default]
    Abort,

    /// Record the entry as skipped, report it, and keep going.
    SkipEntry,
}

/// Configuration for packaging a directory tree into a ZIP archive.
///
/// # Examples
///
/// ```
/// use dirpack_core::ArchiveConfig;
///
/// let config = ArchiveConfig::default()
///     .with_subdirectory("dist")
///     .with_ignore_patterns(vec!["build/*".to_string()])
///     .with_reproducible(true);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Subdirectory every entry is placed under inside the archive.
    ///
    /// Default: `None` (entries at the archive root).
    pub subdirectory: Option<String>,

    /// Glob patterns matched against paths relative to the source root.
    /// An entry matching any of them is left out, together with its subtree
    /// when it is a directory.
    ///
    /// Default: empty.
    pub ignore_patterns: Vec<String>,

    /// Sort entries and pin modification times so that identical inputs
    /// produce byte-identical archives.
    ///
    /// Default: `false`.
    pub reproducible: bool,

    /// How modification times are pinned when `reproducible` is set.
    ///
    /// Default: [`MtimePolicy::TouchSource`].
    pub mtime_policy: MtimePolicy,

    /// Behavior when a single file cannot be archived.
    ///
    /// Default: [`FailurePolicy::Abort`].
    pub failure_policy: FailurePolicy,

    /// Compression level. `None` uses the default Deflate level, `Some(0)`
    /// stores entries uncompressed, `Some(1..=9)` selects a Deflate level.
    ///
    /// Default: `None`.
    pub compression_level: Option<u8>,

    /// Store Unix permission bits of source files in the archive.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            subdirectory: None,
            ignore_patterns: Vec::new(),
            reproducible: false,
            mtime_policy: MtimePolicy::default(),
            failure_policy: FailurePolicy::default(),
            compression_level: None,
            preserve_permissions: true,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new `ArchiveConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subdirectory prefix.
    #[must_use]
    pub fn with_subdirectory(mut self, subdirectory: impl Into<String>) -> Self {
        self.subdirectory = Some(subdirectory.into());
        self
    }

    /// Sets or clears the subdirectory prefix.
    #[must_use]
    pub fn with_subdirectory_opt(mut self, subdirectory: Option<String>) -> Self {
        self.subdirectory = subdirectory;
        self
    }

    /// Sets the ignore patterns.
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Appends one ignore pattern.
    #[must_use]
    pub fn with_ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_patterns.push(pattern.into());
        self
    }

    /// Sets reproducible mode.
    #[must_use]
    pub fn with_reproducible(mut self, reproducible: bool) -> Self {
        self.reproducible = reproducible;
        self
    }

    /// Sets the modification time policy.
    #[must_use]
    pub fn with_mtime_policy(mut self, policy: MtimePolicy) -> Self {
        self.mtime_policy = policy;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Sets the compression level. Checked by [`validate`](Self::validate).
    #[must_use]
    pub fn with_compression_level(mut self, level: Option<u8>) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets whether to preserve permissions.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Validates the configuration.
    ///
    /// Ignore patterns are checked when they are compiled, see
    /// [`Exclusions::new`](crate::Exclusions::new).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The subdirectory is empty, absolute, ends with `/`, contains a
    ///   backslash, or has an empty, `.` or `..` segment
    /// - The compression level is greater than 9
    pub fn validate(&self) -> Result<()> {
        if let Some(prefix) = &self.subdirectory {
            validate_subdirectory(prefix)?;
        }

        if let Some(level) = self.compression_level
            && level > 9
        {
            return Err(ArchiveError::InvalidCompressionLevel { level });
        }

        Ok(())
    }
}

fn validate_subdirectory(prefix: &str) -> Result<()> {
    let reject = |reason| {
        Err(ArchiveError::InvalidSubdirectory {
            prefix: prefix.to_string(),
            reason,
        })
    };

    if prefix.is_empty() {
        return reject("must not be empty");
    }
    if prefix.contains('\\') {
        return reject("must use '/' as separator");
    }
    if prefix.starts_with('/') {
        return reject("must be relative");
    }
    if prefix.ends_with('/') {
        return reject("must not end with '/'");
    }
    if prefix
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return reject("segments must not be empty, '.' or '..'");
    }

    Ok(())
}
