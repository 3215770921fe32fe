//! Exclusion rules for the tree walk.
//!
//! Two rules decide whether an entry is left out of the archive:
//! - version-control metadata directories are always excluded
//! - an entry whose path relative to the source root matches any ignore
//!   glob is excluded
//!
//! Glob syntax and matching are delegated to `globset`. Matching is done on
//! the relative path with `/` separators on every platform, and `*` may
//! cross separators, so `*.log` matches `logs/app.log` as well.

use crate::ArchiveError;
use crate::Result;
use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use std::path::Component;
use std::path::Path;

/// Names of version-control metadata directories excluded unconditionally.
pub const VCS_DIRECTORIES: &[&str] = &[
    ".git",
    ".svn",
    "_svn",
    ".hg",
    ".bzr",
    "CVS",
    "_darcs",
    ".arch-params",
    ".monotone",
];

/// Compiled exclusion rules.
///
/// # Examples
///
/// ```
/// use dirpack_core::Exclusions;
/// use std::path::Path;
///
/// let exclusions = Exclusions::new(&["build/*", "*.tmp"])?;
///
/// assert!(exclusions.matches(Path::new("build/output.o")));
/// assert!(exclusions.matches(Path::new("notes.tmp")));
/// assert!(exclusions.matches(Path::new(".git")));
/// assert!(!exclusions.matches(Path::new("src/lib.rs")));
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Exclusions {
    ignores: GlobSet,
    patterns: Vec<String>,
}

impl Exclusions {
    /// Compiles the given ignore patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidPattern`] for the first pattern that
    /// is not a valid glob.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|source| ArchiveError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }

        let ignores = builder.build().map_err(|source| ArchiveError::InvalidPattern {
            pattern: patterns
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(", "),
            source,
        })?;

        Ok(Self {
            ignores,
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
        })
    }

    /// Rules with no ignore patterns; only VCS directories are excluded.
    #[must_use]
    pub fn vcs_only() -> Self {
        Self {
            ignores: GlobSet::empty(),
            patterns: Vec::new(),
        }
    }

    /// Returns the ignore patterns these rules were compiled from.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Checks the entry itself, without looking at its ancestors.
    ///
    /// Walkers that prune excluded directories only need this check.
    #[must_use]
    pub fn matches(&self, relative: &Path) -> bool {
        is_vcs_path(relative) || self.ignores.is_match(relative)
    }

    /// Checks the entry and every ancestor directory below the root.
    ///
    /// An entry inside an excluded directory is excluded too.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::Exclusions;
    /// use std::path::Path;
    ///
    /// let exclusions = Exclusions::new(&["node_modules"])?;
    /// assert!(!exclusions.matches(Path::new("node_modules/pkg/index.js")));
    /// assert!(exclusions.excludes(Path::new("node_modules/pkg/index.js")));
    /// # Ok::<(), dirpack_core::ArchiveError>(())
    /// ```
    #[must_use]
    pub fn excludes(&self, relative: &Path) -> bool {
        relative
            .ancestors()
            .filter(|ancestor| !ancestor.as_os_str().is_empty())
            .any(|ancestor| self.matches(ancestor))
    }
}

impl Default for Exclusions {
    fn default() -> Self {
        Self::vcs_only()
    }
}

/// Returns `true` if any component of the path is a VCS metadata directory.
#[must_use]
pub fn is_vcs_path(relative: &Path) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(name) => name
            .to_str()
            .is_some_and(|name| VCS_DIRECTORIES.contains(&name)),
        _ => false,
    })
}
