//! Deterministic ZIP packaging of directory trees.
//!
//! `dirpack-core` walks a source directory, leaves out version-control
//! metadata and caller-supplied glob patterns, maps every remaining file to a
//! `/`-separated archive path (optionally below a subdirectory prefix) and
//! streams it into a ZIP archive. In reproducible mode entries are written in
//! sorted order with a fixed modification time, so identical trees produce
//! byte-identical archives.
//!
//! # Examples
//!
//! ```no_run
//! use dirpack_core::ArchiveConfig;
//! use dirpack_core::Verbosity;
//! use dirpack_core::archive_directory;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiveConfig::default()
//!     .with_subdirectory("my-plugin")
//!     .with_ignore_pattern("node_modules")
//!     .with_reproducible(true);
//!
//! let mut sink = |message: &str, _level: Verbosity| eprintln!("{message}");
//! let report = archive_directory("build/", "dist/my-plugin.zip", &config, &mut sink)?;
//! println!("Archived {} files", report.files_added);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archiver;
pub mod config;
pub mod error;
pub mod filters;
pub mod mapper;
pub mod progress;
pub mod report;
pub mod walker;
pub mod writer;

pub use archiver::DirectoryArchiver;
pub use archiver::archive_directory;
pub use archiver::archive_with_walker;
pub use archiver::plan_entries;
pub use config::ArchiveConfig;
pub use config::FailurePolicy;
pub use config::MtimePolicy;
pub use config::REPRODUCIBLE_MTIME;
pub use error::ArchiveError;
pub use error::Result;
pub use filters::Exclusions;
pub use mapper::ArchiveEntry;
pub use mapper::PathMapper;
pub use progress::NoopSink;
pub use progress::ProgressSink;
#[cfg(feature = "tracing")]
pub use progress::TracingSink;
pub use progress::Verbosity;
pub use report::ArchiveReport;
pub use writer::ArchiveWriter;
