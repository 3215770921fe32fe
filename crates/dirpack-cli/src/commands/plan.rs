//! Plan command implementation.

use crate::cli::PlanArgs;
use crate::config;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use dirpack_core::plan_entries;
use dirpack_core::walker::FsWalker;

pub fn execute(args: &PlanArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let source = &args.selection.source;
    let config = config::resolve(&args.selection)?;

    let walker = FsWalker::new(source);
    let entries = add_archive_context(plan_entries(&walker, &config), source)?;

    formatter.format_plan(source, &entries)?;

    Ok(())
}
