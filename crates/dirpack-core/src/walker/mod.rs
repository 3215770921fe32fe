//! Source tree enumeration.
//!
//! A [`TreeWalker`] lists every entry below a source root, leaving out
//! whatever the [`Exclusions`] reject. Two implementations exist:
//! [`FsWalker`] reads the real filesystem and [`MemoryWalker`] serves a
//! fixed listing for tests.
//!
//! [`walk_entries`] adds the ordering rule on top: reproducible runs get
//! every entry up front, sorted by relative path; other runs stream entries
//! in whatever order the walker produces them.

mod fs;
mod memory;

pub use fs::FsWalker;
pub use memory::MemoryWalker;

use crate::Result;
use crate::filters::Exclusions;
use std::path::Path;
use std::path::PathBuf;

/// Kind of a walked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    /// Regular file, or a symlink resolving to one.
    File,
    /// Directory. Traversed, never archived.
    Directory,
    /// Anything else (dangling symlink, socket, device). Never archived.
    Other,
}

/// An entry found below the source root that passed the exclusion rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedEntry {
    /// Full path of the entry (source root joined with the relative path).
    pub path: PathBuf,

    /// Path relative to the source root.
    pub relative_path: PathBuf,

    /// What the entry is.
    pub kind: EntryKind,
}

impl WalkedEntry {
    /// Returns `true` for entries the archive writer should receive.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Sort key: the relative path with `/` separators, compared byte-wise.
    fn sort_key(&self) -> String {
        let mut key = String::new();
        for (idx, component) in self.relative_path.components().enumerate() {
            if idx > 0 {
                key.push('/');
            }
            key.push_str(&component.as_os_str().to_string_lossy());
        }
        key
    }
}

/// Iterator over walked entries, as returned by [`TreeWalker::walk`].
pub type EntryIter<'a> = Box<dyn Iterator<Item = Result<WalkedEntry>> + 'a>;

/// Enumerates the entries of a source tree.
pub trait TreeWalker {
    /// The source root every entry is relative to.
    fn root(&self) -> &Path;

    /// Checks that the root can be walked before anything else happens.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Filesystem`](crate::ArchiveError::Filesystem)
    /// if the root is missing or is not a directory.
    fn check_root(&self) -> Result<()> {
        Ok(())
    }

    /// Returns a lazy iterator over every entry below the root (the root
    /// itself excluded) that `exclusions` does not reject.
    ///
    /// An entry inside an excluded directory must not be yielded either.
    /// Failures to read the tree are yielded as
    /// [`ArchiveError::Filesystem`](crate::ArchiveError::Filesystem).
    fn walk<'a>(&'a self, exclusions: &'a Exclusions) -> EntryIter<'a>;
}

/// Walks `walker` and applies the ordering rule.
///
/// With `sorted` set, the whole walk is realized first and ordered by the
/// bytes of each entry's `/`-separated relative path; the first walk error
/// is returned immediately. Otherwise entries stream lazily in walk order.
///
/// # Errors
///
/// With `sorted`, returns the first error produced by the walk.
///
/// # Examples
///
/// ```
/// use dirpack_core::Exclusions;
/// use dirpack_core::walker::MemoryWalker;
/// use dirpack_core::walker::walk_entries;
///
/// let walker = MemoryWalker::new("/project")
///     .file("zeta.txt")
///     .file("alpha.txt");
/// let exclusions = Exclusions::vcs_only();
///
/// let names: Vec<_> = walk_entries(&walker, &exclusions, true)?
///     .map(|entry| entry.map(|e| e.relative_path))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(names, ["alpha.txt", "zeta.txt"].map(std::path::PathBuf::from));
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
pub fn walk_entries<'a, W>(
    walker: &'a W,
    exclusions: &'a Exclusions,
    sorted: bool,
) -> Result<EntryIter<'a>>
where
    W: TreeWalker + ?Sized,
{
    if !sorted {
        return Ok(walker.walk(exclusions));
    }

    let mut entries = walker.walk(exclusions).collect::<Result<Vec<_>>>()?;
    entries.sort_by_cached_key(WalkedEntry::sort_key);
    Ok(Box::new(entries.into_iter().map(Ok)))
}
