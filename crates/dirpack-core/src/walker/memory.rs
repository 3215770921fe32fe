//! In-memory tree walker for tests.

use super::EntryIter;
use super::EntryKind;
use super::TreeWalker;
use super::WalkedEntry;
use crate::ArchiveError;
use crate::filters::Exclusions;
use std::io;
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug, Clone)]
enum Listing {
    Entry(PathBuf, EntryKind),
    Failure(PathBuf),
}

impl Listing {
    fn relative(&self) -> &Path {
        match self {
            Self::Entry(path, _) | Self::Failure(path) => path,
        }
    }
}

/// Tree walker serving a fixed listing under a virtual root.
///
/// Entries are yielded in insertion order, which stands in for the
/// unspecified order of a real filesystem. Adding a nested path registers
/// its missing parent directories first, the way they would appear on disk.
/// Nothing is read from or written to disk.
///
/// # Examples
///
/// ```
/// use dirpack_core::Exclusions;
/// use dirpack_core::walker::MemoryWalker;
/// use dirpack_core::walker::TreeWalker;
///
/// let walker = MemoryWalker::new("/project")
///     .file("src/lib.rs")
///     .file(".git/HEAD");
///
/// let exclusions = Exclusions::vcs_only();
/// let found: Vec<_> = walker
///     .walk(&exclusions)
///     .map(|entry| entry.map(|e| e.relative_path))
///     .collect::<Result<_, _>>()?;
///
/// assert_eq!(found, ["src", "src/lib.rs"].map(std::path::PathBuf::from));
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryWalker {
    root: PathBuf,
    listing: Vec<Listing>,
}

impl MemoryWalker {
    /// Creates an empty walker rooted at the virtual path `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            listing: Vec::new(),
        }
    }

    /// Adds a regular file.
    #[must_use]
    pub fn file(self, relative: impl AsRef<Path>) -> Self {
        self.push(relative.as_ref(), EntryKind::File)
    }

    /// Adds a directory.
    #[must_use]
    pub fn dir(self, relative: impl AsRef<Path>) -> Self {
        self.push(relative.as_ref(), EntryKind::Directory)
    }

    /// Adds a non-regular entry (socket, device, dangling symlink).
    #[must_use]
    pub fn other(self, relative: impl AsRef<Path>) -> Self {
        self.push(relative.as_ref(), EntryKind::Other)
    }

    /// Adds an entry that fails to be read when the walk reaches it.
    #[must_use]
    pub fn fail(mut self, relative: impl AsRef<Path>) -> Self {
        let relative = relative.as_ref();
        self.add_parents(relative);
        self.listing.push(Listing::Failure(relative.to_path_buf()));
        self
    }

    fn push(mut self, relative: &Path, kind: EntryKind) -> Self {
        self.add_parents(relative);
        if !self.contains(relative) {
            self.listing
                .push(Listing::Entry(relative.to_path_buf(), kind));
        }
        self
    }

    fn add_parents(&mut self, relative: &Path) {
        let mut parents: Vec<&Path> = relative
            .ancestors()
            .skip(1)
            .filter(|parent| !parent.as_os_str().is_empty())
            .collect();
        parents.reverse();

        for parent in parents {
            if !self.contains(parent) {
                self.listing
                    .push(Listing::Entry(parent.to_path_buf(), EntryKind::Directory));
            }
        }
    }

    fn contains(&self, relative: &Path) -> bool {
        self.listing.iter().any(|item| item.relative() == relative)
    }
}

impl TreeWalker for MemoryWalker {
    fn root(&self) -> &Path {
        &self.root
    }

    fn walk<'a>(&'a self, exclusions: &'a Exclusions) -> EntryIter<'a> {
        let root = self.root.as_path();

        Box::new(
            self.listing
                .iter()
                .filter(move |item| !exclusions.excludes(item.relative()))
                .map(move |item| match item {
                    Listing::Entry(relative, kind) => Ok(WalkedEntry {
                        path: root.join(relative),
                        relative_path: relative.clone(),
                        kind: *kind,
                    }),
                    Listing::Failure(relative) => Err(ArchiveError::Filesystem {
                        path: root.join(relative),
                        source: io::Error::new(io::ErrorKind::NotFound, "entry vanished during walk"),
                    }),
                }),
        )
    }
}
