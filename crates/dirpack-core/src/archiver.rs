//! Directory archiving: drives the walker, mapper and writer.

use crate::Result;
use crate::config::ArchiveConfig;
use crate::config::FailurePolicy;
use crate::config::MtimePolicy;
use crate::filters::Exclusions;
use crate::mapper::ArchiveEntry;
use crate::mapper::PathMapper;
use crate::progress::NoopSink;
use crate::progress::ProgressSink;
use crate::progress::Verbosity;
use crate::report::ArchiveReport;
use crate::walker::EntryKind;
use crate::walker::FsWalker;
use crate::walker::TreeWalker;
use crate::walker::walk_entries;
use crate::writer::ArchiveWriter;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Packages the directory `source` into a ZIP archive at `destination`.
///
/// The destination is created or truncated. Every file below `source` that
/// is not excluded is written into the archive, mapped below
/// `config.subdirectory` when one is set. Directories themselves are not
/// stored. Progress is reported through `sink`.
///
/// # Errors
///
/// Configuration errors are raised before any filesystem access. A missing
/// source root is raised before the destination is created. Any error after
/// the destination was created removes it again. Every error is passed to
/// [`ProgressSink::write_error`] once before it is returned.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::ArchiveConfig;
/// use dirpack_core::NoopSink;
/// use dirpack_core::archive_directory;
///
/// let config = ArchiveConfig::default()
///     .with_subdirectory("my-plugin")
///     .with_reproducible(true);
///
/// let report = archive_directory("build/", "dist/my-plugin.zip", &config, &mut NoopSink)?;
/// println!("archived {} files", report.files_added);
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
pub fn archive_directory(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    config: &ArchiveConfig,
    sink: &mut dyn ProgressSink,
) -> Result<ArchiveReport> {
    let walker = FsWalker::new(source.as_ref());
    archive_with_walker(&walker, destination, config, sink)
}

/// Same as [`archive_directory`], reading the tree through `walker`.
///
/// # Errors
///
/// See [`archive_directory`].
pub fn archive_with_walker<W>(
    walker: &W,
    destination: impl AsRef<Path>,
    config: &ArchiveConfig,
    sink: &mut dyn ProgressSink,
) -> Result<ArchiveReport>
where
    W: TreeWalker + ?Sized,
{
    let destination = destination.as_ref();
    let mut opened = false;

    match run(walker, destination, config, sink, &mut opened) {
        Ok(report) => Ok(report),
        Err(err) => {
            if opened {
                let _ = fs::remove_file(destination);
            }
            sink.write_error(&err.to_string());
            Err(err)
        }
    }
}

fn run<W>(
    walker: &W,
    destination: &Path,
    config: &ArchiveConfig,
    sink: &mut dyn ProgressSink,
    opened: &mut bool,
) -> Result<ArchiveReport>
where
    W: TreeWalker + ?Sized,
{
    let start = Instant::now();
    let mut report = ArchiveReport::new();

    config.validate()?;
    let exclusions = Exclusions::new(&config.ignore_patterns)?;
    walker.check_root()?;

    let mapper = PathMapper::new(walker.root(), config.subdirectory.as_deref());
    match mapper.subdirectory() {
        Some(prefix) => sink.write(
            &format!("[ZIP archive] archiving into subdirectory {prefix}"),
            Verbosity::Normal,
        ),
        None => sink.write("[ZIP archive] archiving into root directory", Verbosity::Normal),
    }

    sink.write(
        &format!("creating ZIP file {}", destination.display()),
        Verbosity::Verbose,
    );
    let mut writer = ArchiveWriter::create(destination, config)?;
    *opened = true;
    let own_archive = fs::canonicalize(destination).ok();

    for entry in walk_entries(walker, &exclusions, config.reproducible)? {
        let entry = entry?;
        match entry.kind {
            EntryKind::Directory => {
                report.directories_traversed += 1;
                continue;
            }
            EntryKind::Other => {
                report.entries_skipped += 1;
                continue;
            }
            EntryKind::File => {}
        }

        if is_own_archive(&entry.path, own_archive.as_deref()) {
            continue;
        }

        let added = mapper.map_entry(&entry.path).and_then(|mapped| {
            sink.write(
                &format!("adding {} as {}", mapped.source.display(), mapped.archive_path),
                Verbosity::Verbose,
            );
            let bytes = writer.add_file(&mapped)?;
            Ok((mapped, bytes))
        });

        match added {
            Ok((mapped, bytes)) => {
                report.files_added += 1;
                report.bytes_written += bytes;
                report.entries.push(mapped.archive_path);
            }
            Err(err) if err.is_entry_error() && config.failure_policy == FailurePolicy::SkipEntry => {
                let message = err.to_string();
                sink.write_error(&message);
                report.entries_skipped += 1;
                report.add_warning(message);
            }
            Err(err) => return Err(err),
        }
    }

    let file = writer.finish()?;
    report.archive_size = file.metadata().map_or(0, |metadata| metadata.len());
    report.duration = start.elapsed();

    sink.write(
        &format!(
            "ZIP archive {} done ({} files)",
            destination.display(),
            report.files_added
        ),
        Verbosity::Normal,
    );

    Ok(report)
}

/// The destination may live inside the source tree; it is never archived
/// into itself.
fn is_own_archive(path: &Path, own_archive: Option<&Path>) -> bool {
    let Some(own_archive) = own_archive else {
        return false;
    };
    if path.file_name() != own_archive.file_name() {
        return false;
    }
    fs::canonicalize(path).is_ok_and(|resolved| resolved == own_archive)
}

/// Lists the entries an archiving run would write, without writing anything.
///
/// Runs the same validation, exclusion, ordering and mapping as
/// [`archive_with_walker`]. The source tree is not modified, whatever the
/// mtime policy.
///
/// # Errors
///
/// Returns configuration errors, a missing source root, walk errors, and
/// mapping errors (the latter are skipped under
/// [`FailurePolicy::SkipEntry`]).
///
/// # Examples
///
/// ```
/// use dirpack_core::ArchiveConfig;
/// use dirpack_core::plan_entries;
/// use dirpack_core::walker::MemoryWalker;
///
/// let walker = MemoryWalker::new("/project")
///     .file("src/b.rs")
///     .file("src/a.rs")
///     .file(".git/config");
/// let config = ArchiveConfig::default()
///     .with_subdirectory("pkg")
///     .with_reproducible(true);
///
/// let planned: Vec<_> = plan_entries(&walker, &config)?
///     .into_iter()
///     .map(|entry| entry.archive_path)
///     .collect();
/// assert_eq!(planned, vec!["pkg/src/a.rs", "pkg/src/b.rs"]);
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
pub fn plan_entries<W>(walker: &W, config: &ArchiveConfig) -> Result<Vec<ArchiveEntry>>
where
    W: TreeWalker + ?Sized,
{
    config.validate()?;
    let exclusions = Exclusions::new(&config.ignore_patterns)?;
    walker.check_root()?;

    let mapper = PathMapper::new(walker.root(), config.subdirectory.as_deref());
    let mut planned = Vec::new();

    for entry in walk_entries(walker, &exclusions, config.reproducible)? {
        let entry = entry?;
        if !entry.is_file() {
            continue;
        }
        match mapper.map_entry(&entry.path) {
            Ok(mapped) => planned.push(mapped),
            Err(_) if config.failure_policy == FailurePolicy::SkipEntry => {}
            Err(err) => return Err(err),
        }
    }

    Ok(planned)
}

/// Builder for archiving a directory with a fluent API.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::DirectoryArchiver;
///
/// let report = DirectoryArchiver::new("build/", "dist/plugin.zip")
///     .subdirectory("plugin")
///     .ignore("*.log")
///     .ignore("node_modules")
///     .reproducible(true)
///     .create()?;
///
/// println!("archived {} files", report.files_added);
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryArchiver {
    source: PathBuf,
    destination: PathBuf,
    config: ArchiveConfig,
}

impl DirectoryArchiver {
    /// Creates a builder archiving `source` into `destination`.
    #[must_use]
    pub fn new(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            destination: destination.as_ref().to_path_buf(),
            config: ArchiveConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ArchiveConfig) -> Self {
        self.config = config;
        self
    }

    /// Places every entry under `name` inside the archive.
    #[must_use]
    pub fn subdirectory(mut self, name: impl Into<String>) -> Self {
        self.config.subdirectory = Some(name.into());
        self
    }

    /// Adds an ignore pattern.
    #[must_use]
    pub fn ignore<S: Into<String>>(mut self, pattern: S) -> Self {
        self.config.ignore_patterns.push(pattern.into());
        self
    }

    /// Enables or disables reproducible mode.
    #[must_use]
    pub fn reproducible(mut self, reproducible: bool) -> Self {
        self.config.reproducible = reproducible;
        self
    }

    /// Sets how reproducible mode pins modification times.
    #[must_use]
    pub fn mtime_policy(mut self, policy: MtimePolicy) -> Self {
        self.config.mtime_policy = policy;
        self
    }

    /// Sets what happens when a single file cannot be archived.
    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Sets the compression level (0 stores, 1-9 deflates).
    #[must_use]
    pub fn compression_level(mut self, level: u8) -> Self {
        self.config.compression_level = Some(level);
        self
    }

    /// Runs the archiving operation, discarding progress messages.
    ///
    /// # Errors
    ///
    /// See [`archive_directory`].
    pub fn create(self) -> Result<ArchiveReport> {
        self.create_with_sink(&mut NoopSink)
    }

    /// Runs the archiving operation, reporting progress to `sink`.
    ///
    /// # Errors
    ///
    /// See [`archive_directory`].
    pub fn create_with_sink(self, sink: &mut dyn ProgressSink) -> Result<ArchiveReport> {
        archive_directory(&self.source, &self.destination, &self.config, sink)
    }
}

impl From<DirectoryArchiver> for ArchiveConfig {
    fn from(archiver: DirectoryArchiver) -> Self {
        archiver.config
    }
}
