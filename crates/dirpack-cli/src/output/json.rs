//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use dirpack_core::ArchiveEntry;
use dirpack_core::ArchiveReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter {
    operation: &'static str,
}

impl JsonFormatter {
    pub const fn new(operation: &'static str) -> Self {
        Self { operation }
    }

    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct CreationOutput<'a> {
    output_path: String,
    files_added: usize,
    directories_traversed: usize,
    entries_skipped: usize,
    bytes_written: u64,
    archive_size: u64,
    compression_ratio: f64,
    entries: &'a [String],
    duration_ms: u128,
    warnings: &'a [String],
}

#[derive(Serialize)]
struct PlannedEntry<'a> {
    source: String,
    archive_path: &'a str,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    source: String,
    count: usize,
    entries: Vec<PlannedEntry<'a>>,
}

impl OutputFormatter for JsonFormatter {
    fn format_creation_result(&self, output_path: &Path, report: &ArchiveReport) -> Result<()> {
        let data = CreationOutput {
            output_path: output_path.display().to_string(),
            files_added: report.files_added,
            directories_traversed: report.directories_traversed,
            entries_skipped: report.entries_skipped,
            bytes_written: report.bytes_written,
            archive_size: report.archive_size,
            compression_ratio: report.compression_ratio(),
            entries: &report.entries,
            duration_ms: report.duration.as_millis(),
            warnings: &report.warnings,
        };

        Self::output(&JsonOutput::success("create", data))
    }

    fn format_plan(&self, source: &Path, entries: &[ArchiveEntry]) -> Result<()> {
        let data = PlanOutput {
            source: source.display().to_string(),
            count: entries.len(),
            entries: entries
                .iter()
                .map(|entry| PlannedEntry {
                    source: entry.source.display().to_string(),
                    archive_path: &entry.archive_path,
                })
                .collect(),
        };

        Self::output(&JsonOutput::success("plan", data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(self.operation, format!("{error:?}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let output = JsonOutput::success("warning", WarningData { message });
        let _ = Self::output(&output);
    }
}
