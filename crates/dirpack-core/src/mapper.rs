//! Source path to archive path mapping.

use crate::ArchiveError;
use crate::Result;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// A file scheduled for the archive: where it is read from and the name it
/// gets inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Real filesystem path the bytes are read from.
    pub source: PathBuf,

    /// Archive-internal path, `/`-separated.
    pub archive_path: String,
}

/// Maps real paths below a source root to archive-internal paths.
///
/// The mapping is a pure function of the root, the optional subdirectory
/// prefix and the real path: the path relative to the root is joined with
/// `/` and prefixed with `<subdirectory>/` when a subdirectory is set.
///
/// # Examples
///
/// ```
/// use dirpack_core::PathMapper;
/// use std::path::Path;
///
/// let mapper = PathMapper::new("/home/user/project", Some("dist"));
/// let mapped = mapper.map(Path::new("/home/user/project/src/a.txt"))?;
/// assert_eq!(mapped, "dist/src/a.txt");
///
/// let unprefixed = PathMapper::new("/home/user/project", None::<String>);
/// assert_eq!(unprefixed.map(Path::new("/home/user/project/src/a.txt"))?, "src/a.txt");
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PathMapper {
    root: PathBuf,
    subdirectory: Option<String>,
}

impl PathMapper {
    /// Creates a mapper for entries below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, subdirectory: Option<impl Into<String>>) -> Self {
        Self {
            root: root.into(),
            subdirectory: subdirectory.map(Into::into),
        }
    }

    /// Returns the subdirectory prefix, if any.
    #[must_use]
    pub fn subdirectory(&self) -> Option<&str> {
        self.subdirectory.as_deref()
    }

    /// Computes the archive-internal path of `real_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::EntryWrite`] if the path is not below the root,
    /// climbs out of it with `..`, or is not valid UTF-8.
    pub fn map(&self, real_path: &Path) -> Result<String> {
        let relative = real_path.strip_prefix(&self.root).map_err(|_| {
            unmappable(
                real_path,
                format!("path is not under {}", self.root.display()),
            )
        })?;

        let mut archive_path = self.subdirectory.clone().unwrap_or_default();
        for component in relative.components() {
            match component {
                Component::Normal(name) => {
                    let name = name
                        .to_str()
                        .ok_or_else(|| unmappable(real_path, "path is not valid UTF-8"))?;
                    if !archive_path.is_empty() {
                        archive_path.push('/');
                    }
                    archive_path.push_str(name);
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(unmappable(real_path, "path leaves the source root"));
                }
            }
        }

        let trimmed = archive_path.trim_end_matches('/').len();
        archive_path.truncate(trimmed);

        Ok(archive_path)
    }

    /// Maps `real_path` into an [`ArchiveEntry`].
    ///
    /// # Errors
    ///
    /// Same as [`map`](Self::map).
    pub fn map_entry(&self, real_path: &Path) -> Result<ArchiveEntry> {
        Ok(ArchiveEntry {
            archive_path: self.map(real_path)?,
            source: real_path.to_path_buf(),
        })
    }
}

fn unmappable(path: &Path, reason: impl Into<String>) -> ArchiveError {
    ArchiveError::entry_write(path, String::new(), io::Error::other(reason.into()))
}
