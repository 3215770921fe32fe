//! Optional JSON configuration file merged with command-line flags.

use crate::cli::SelectionArgs;
use anyhow::Context;
use anyhow::Result;
use dirpack_core::ArchiveConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings read from `--config <FILE>`.
///
/// ```json
/// {
///   "subdirectory": "my-plugin",
///   "ignore": ["node_modules", "*.log"],
///   "reproducible": true,
///   "compression_level": 9
/// }
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub subdirectory: Option<String>,
    pub ignore: Vec<String>,
    pub reproducible: Option<bool>,
    pub compression_level: Option<u8>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("invalid config file '{}'", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Builds the archive configuration from the selection flags and the
/// optional config file. Flags win over file values; ignore patterns from
/// both are concatenated, file patterns first.
pub fn resolve(selection: &SelectionArgs) -> Result<ArchiveConfig> {
    let file = match &selection.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    Ok(merge(file, selection))
}

fn merge(file: FileConfig, selection: &SelectionArgs) -> ArchiveConfig {
    let mut ignore = file.ignore;
    ignore.extend(selection.ignore.iter().cloned());

    ArchiveConfig::default()
        .with_subdirectory_opt(selection.subdirectory.clone().or(file.subdirectory))
        .with_ignore_patterns(ignore)
        .with_reproducible(selection.reproducible || file.reproducible.unwrap_or(false))
        .with_compression_level(file.compression_level)
}
