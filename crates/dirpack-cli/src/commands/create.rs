//! Create command implementation.

use crate::cli::CreateArgs;
use crate::config;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::ConsoleSink;
use anyhow::Result;
use anyhow::bail;
use dirpack_core::FailurePolicy;
use dirpack_core::MtimePolicy;
use dirpack_core::archive_directory;

pub fn execute(
    args: &CreateArgs,
    formatter: &dyn OutputFormatter,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "Output file '{}' already exists\n\
             HINT: Use --force to overwrite it.",
            args.output.display()
        );
    }

    let mut config = config::resolve(&args.selection)?;
    if let Some(level) = args.compression_level {
        config = config.with_compression_level(Some(level));
    }
    if args.archive_only_mtime {
        if !config.reproducible {
            formatter.format_warning("--archive-only-mtime has no effect without --reproducible");
        }
        config = config.with_mtime_policy(MtimePolicy::ArchiveOnly);
    }
    if args.skip_unreadable {
        config = config.with_failure_policy(FailurePolicy::SkipEntry);
    }

    // The sink is dropped before the summary so the spinner is cleared
    let report = {
        let mut sink = ConsoleSink::new(verbose, quiet);
        add_archive_context(
            archive_directory(&args.selection.source, &args.output, &config, &mut sink),
            &args.output,
        )?
    };

    formatter.format_creation_result(&args.output, &report)?;

    Ok(())
}
