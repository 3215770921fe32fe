//! ZIP archive writing.
//!
//! [`ArchiveWriter`] owns the destination for the whole operation. Creating
//! it opens (create-or-truncate) the destination; [`ArchiveWriter::finish`]
//! consumes it after writing the central directory, so a writer that was
//! never finished cannot be mistaken for a complete archive.

use crate::ArchiveError;
use crate::Result;
use crate::config::ArchiveConfig;
use crate::config::MtimePolicy;
use crate::config::REPRODUCIBLE_MTIME;
use crate::mapper::ArchiveEntry;
use filetime::FileTime;
use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use time::OffsetDateTime;
use zip::CompressionMethod;
use zip::DateTime;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Writes files into a ZIP archive in the order they are given.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::ArchiveConfig;
/// use dirpack_core::ArchiveEntry;
/// use dirpack_core::ArchiveWriter;
///
/// let config = ArchiveConfig::default();
/// let mut writer = ArchiveWriter::create("out.zip", &config)?;
/// writer.add_file(&ArchiveEntry {
///     source: "README.md".into(),
///     archive_path: "README.md".to_string(),
/// })?;
/// writer.finish()?;
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    destination: PathBuf,
    options: SimpleFileOptions,
    pinned_mtime: Option<MtimePolicy>,
    preserve_permissions: bool,
    buffer: Vec<u8>,
    files_written: usize,
}

impl ArchiveWriter<File> {
    /// Creates (or truncates) the archive file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ArchiveCreate`] if the file cannot be created.
    pub fn create(path: impl AsRef<Path>, config: &ArchiveConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ArchiveError::ArchiveCreate {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = Self::new(file, config);
        writer.destination = path.to_path_buf();
        Ok(writer)
    }
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Wraps an already-open seekable writer.
    pub fn new(writer: W, config: &ArchiveConfig) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            destination: PathBuf::new(),
            options: file_options(config.compression_level),
            pinned_mtime: config.reproducible.then_some(config.mtime_policy),
            preserve_permissions: config.preserve_permissions,
            buffer: vec![0u8; COPY_BUFFER_SIZE],
            files_written: 0,
        }
    }

    /// Number of files written so far.
    #[must_use]
    pub fn files_written(&self) -> usize {
        self.files_written
    }

    /// Writes one file into the archive and returns its uncompressed size.
    ///
    /// In reproducible mode with [`MtimePolicy::TouchSource`] the source
    /// file's modification time is set to [`REPRODUCIBLE_MTIME`] on disk
    /// before it is read. With [`MtimePolicy::ArchiveOnly`] the fixed time is
    /// only written into the entry header.
    ///
    /// If the copy fails after the entry was started, the entry is removed
    /// from the archive again.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::EntryWrite`] if the source cannot be touched,
    /// opened or read, or the entry cannot be written.
    pub fn add_file(&mut self, entry: &ArchiveEntry) -> Result<u64> {
        let fail =
            |source: io::Error| ArchiveError::entry_write(&entry.source, &entry.archive_path, source);

        if self.pinned_mtime == Some(MtimePolicy::TouchSource) {
            filetime::set_file_mtime(&entry.source, FileTime::from_unix_time(REPRODUCIBLE_MTIME, 0))
                .map_err(fail)?;
        }

        let mut file = File::open(&entry.source).map_err(fail)?;
        let metadata = file.metadata().map_err(fail)?;

        let modified = if self.pinned_mtime == Some(MtimePolicy::ArchiveOnly) {
            REPRODUCIBLE_MTIME
        } else {
            FileTime::from_last_modification_time(&metadata).unix_seconds()
        };

        let mut options = self
            .options
            .last_modified_time(zip_datetime(modified))
            .large_file(metadata.len() >= u64::from(u32::MAX));

        #[cfg(unix)]
        if self.preserve_permissions {
            use std::os::unix::fs::PermissionsExt;
            options = options.unix_permissions(metadata.permissions().mode());
        }

        self.zip
            .start_file(entry.archive_path.as_str(), options)
            .map_err(|e| fail(zip_to_io(e)))?;

        let mut bytes_written = 0u64;
        loop {
            let bytes_read = match file.read(&mut self.buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    let _ = self.zip.abort_file();
                    return Err(fail(e));
                }
            };
            if let Err(e) = self.zip.write_all(&self.buffer[..bytes_read]) {
                let _ = self.zip.abort_file();
                return Err(fail(e));
            }
            bytes_written += bytes_read as u64;
        }

        self.files_written += 1;
        Ok(bytes_written)
    }

    /// Writes the central directory and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ArchiveFinalize`] if the central directory
    /// cannot be written.
    pub fn finish(self) -> Result<W> {
        let destination = self.destination;
        self.zip
            .finish()
            .map_err(|e| ArchiveError::ArchiveFinalize {
                path: destination,
                source: zip_to_io(e),
            })
    }
}

fn file_options(compression_level: Option<u8>) -> SimpleFileOptions {
    match compression_level {
        Some(0) => SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        Some(level) => SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(level))),
        None => SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
    }
}

/// Converts Unix seconds to a ZIP (DOS) timestamp, read as UTC.
///
/// Times the DOS format cannot hold fall back to 1980-01-01 00:00:00.
fn zip_datetime(unix_seconds: i64) -> DateTime {
    OffsetDateTime::from_unix_timestamp(unix_seconds)
        .ok()
        .and_then(|dt| {
            DateTime::from_date_and_time(
                u16::try_from(dt.year()).ok()?,
                u8::from(dt.month()),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second(),
            )
            .ok()
        })
        .unwrap_or_default()
}

fn zip_to_io(err: ZipError) -> io::Error {
    match err {
        ZipError::Io(err) => err,
        other => io::Error::other(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn entry(source: &Path, archive_path: &str) -> ArchiveEntry {
        ArchiveEntry {
            source: source.to_path_buf(),
            archive_path: archive_path.to_string(),
        }
    }

    fn read_back(bytes: Vec<u8>) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        zip::ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_add_file_writes_content_under_archive_path() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "hello").unwrap();

        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()), &ArchiveConfig::default());
        let size = writer.add_file(&entry(&source, "dist/a.txt")).unwrap();
        assert_eq!(size, 5);
        assert_eq!(writer.files_written(), 1);

        let mut archive = read_back(writer.finish().unwrap().into_inner());
        assert_eq!(archive.len(), 1);
        let mut file = archive.by_name("dist/a.txt").unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        assert_eq!(content, "hello");
        assert_eq!(file.compression(), CompressionMethod::Deflated);
    }

    #[test]
    fn test_level_zero_stores_entries() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "a".repeat(1000)).unwrap();

        let config = ArchiveConfig::default().with_compression_level(Some(0));
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()), &config);
        writer.add_file(&entry(&source, "a.txt")).unwrap();

        let mut archive = read_back(writer.finish().unwrap().into_inner());
        assert_eq!(
            archive.by_index(0).unwrap().compression(),
            CompressionMethod::Stored
        );
    }

    #[test]
    fn test_touch_source_pins_source_mtime() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "hello").unwrap();

        let config = ArchiveConfig::default().with_reproducible(true);
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()), &config);
        writer.add_file(&entry(&source, "a.txt")).unwrap();

        let mtime = FileTime::from_last_modification_time(&fs::metadata(&source).unwrap());
        assert_eq!(mtime.unix_seconds(), REPRODUCIBLE_MTIME);

        let mut archive = read_back(writer.finish().unwrap().into_inner());
        let file = archive.by_index(0).unwrap();
        assert_eq!(file.last_modified(), Some(zip_datetime(REPRODUCIBLE_MTIME)));
    }

    #[test]
    fn test_archive_only_leaves_source_untouched() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        fs::write(&source, "hello").unwrap();
        let original = FileTime::from_unix_time(1_700_000_000, 0);
        filetime::set_file_mtime(&source, original).unwrap();

        let config = ArchiveConfig::default()
            .with_reproducible(true)
            .with_mtime_policy(MtimePolicy::ArchiveOnly);
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()), &config);
        writer.add_file(&entry(&source, "a.txt")).unwrap();

        let mtime = FileTime::from_last_modification_time(&fs::metadata(&source).unwrap());
        assert_eq!(mtime, original);

        let mut archive = read_back(writer.finish().unwrap().into_inner());
        let file = archive.by_index(0).unwrap();
        assert_eq!(file.last_modified(), Some(zip_datetime(REPRODUCIBLE_MTIME)));
    }

    #[test]
    fn test_missing_source_is_entry_error() {
        let temp = TempDir::new().unwrap();
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()), &ArchiveConfig::default());

        let err = writer
            .add_file(&entry(&temp.path().join("gone.txt"), "gone.txt"))
            .unwrap_err();
        assert_eq!(err.code(), "ENTRY_WRITE_ERROR");
        assert_eq!(writer.files_written(), 0);

        let archive = read_back(writer.finish().unwrap().into_inner());
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing/out.zip");

        let result = ArchiveWriter::create(&path, &ArchiveConfig::default());
        assert!(matches!(result, Err(ArchiveError::ArchiveCreate { .. })));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("run.sh");
        fs::write(&source, "#!/bin/sh").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o755)).unwrap();

        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()), &ArchiveConfig::default());
        writer.add_file(&entry(&source, "run.sh")).unwrap();

        let mut archive = read_back(writer.finish().unwrap().into_inner());
        let mode = archive.by_index(0).unwrap().unix_mode().unwrap();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_zip_datetime_conversion() {
        let dt = zip_datetime(REPRODUCIBLE_MTIME);
        assert_eq!(dt.year(), 2017);
        assert_eq!(dt.month(), 7);
        assert_eq!(dt.day(), 14);
        assert_eq!(dt.hour(), 2);
        assert_eq!(dt.minute(), 40);
        assert_eq!(dt.second(), 0);
    }

    #[test]
    fn test_zip_datetime_out_of_range_falls_back() {
        assert_eq!(zip_datetime(0), DateTime::default());
        assert_eq!(zip_datetime(-1), DateTime::default());
    }
}
