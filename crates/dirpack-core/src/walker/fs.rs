//! Filesystem-backed tree walker.

use super::EntryIter;
use super::EntryKind;
use super::TreeWalker;
use super::WalkedEntry;
use crate::ArchiveError;
use crate::Result;
use crate::filters::Exclusions;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Walks a real directory tree with `walkdir`.
///
/// Directory symlinks are not followed. A symlink that resolves to a regular
/// file is reported as [`EntryKind::File`]; other symlinks, including
/// dangling ones, are reported as [`EntryKind::Other`]. Excluded directories
/// are pruned, so nothing below them is read.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::Exclusions;
/// use dirpack_core::walker::FsWalker;
/// use dirpack_core::walker::TreeWalker;
///
/// let walker = FsWalker::new("./project");
/// let exclusions = Exclusions::new(&["target"])?;
///
/// for entry in walker.walk(&exclusions) {
///     let entry = entry?;
///     println!("found: {}", entry.relative_path.display());
/// }
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FsWalker {
    root: PathBuf,
}

impl FsWalker {
    /// Creates a walker rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TreeWalker for FsWalker {
    fn root(&self) -> &Path {
        &self.root
    }

    fn check_root(&self) -> Result<()> {
        let metadata = std::fs::metadata(&self.root).map_err(|source| ArchiveError::Filesystem {
            path: self.root.clone(),
            source,
        })?;

        if metadata.is_dir() {
            Ok(())
        } else {
            Err(ArchiveError::Filesystem {
                path: self.root.clone(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "source root is not a directory"),
            })
        }
    }

    fn walk<'a>(&'a self, exclusions: &'a Exclusions) -> EntryIter<'a> {
        let root = self.root.as_path();

        let entries = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |entry| {
                // Pruning here keeps excluded subtrees from being read at all
                match entry.path().strip_prefix(root) {
                    Ok(relative) if !relative.as_os_str().is_empty() => {
                        !exclusions.matches(relative)
                    }
                    _ => true,
                }
            });

        Box::new(entries.map(move |entry| match entry {
            Ok(entry) => build_entry(root, &entry),
            Err(err) => Err(walk_error(root, err)),
        }))
    }
}

fn build_entry(root: &Path, entry: &walkdir::DirEntry) -> Result<WalkedEntry> {
    let path = entry.path().to_path_buf();
    let relative_path = path
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| ArchiveError::Filesystem {
            path: path.clone(),
            source: io::Error::other(format!("entry is not under {}", root.display())),
        })?;

    let file_type = entry.file_type();
    let kind = if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_symlink() {
        resolve_symlink(&path)
    } else {
        EntryKind::Other
    };

    Ok(WalkedEntry {
        path,
        relative_path,
        kind,
    })
}

/// Symlinks count as files only when they resolve to a regular file.
fn resolve_symlink(path: &Path) -> EntryKind {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => EntryKind::File,
        _ => EntryKind::Other,
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> ArchiveError {
    let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message));
    ArchiveError::Filesystem { path, source }
}
