//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show per-file progress messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package a directory into a ZIP archive
    Create(CreateArgs),
    /// List the archive paths `create` would write, without writing anything
    Plan(PlanArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Arguments shared by `create` and `plan`.
#[derive(clap::Args)]
pub struct SelectionArgs {
    /// Directory to archive
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Place every entry under this directory inside the archive
    #[arg(long, value_name = "NAME")]
    pub subdirectory: Option<String>,

    /// Leave out paths matching this glob (relative to SOURCE, can be repeated)
    #[arg(long = "ignore", short = 'x', value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Sort entries and pin modification times for byte-identical output
    #[arg(long)]
    pub reproducible: bool,

    /// Read defaults from a JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Pin modification times in the archive only, leaving source files
    /// untouched (by default --reproducible rewrites source mtimes)
    #[arg(long)]
    pub archive_only_mtime: bool,

    /// Skip files that cannot be read instead of aborting
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Compression level (0 stores, 1-9 deflates)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,

    /// Overwrite output file if exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
