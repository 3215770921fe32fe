//! dirpack CLI - Deterministic ZIP packaging of directory trees.

mod cli;
mod commands;
mod config;
mod error;
mod output;
mod progress;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let operation = match &cli.command {
        cli::Commands::Create(_) => "create",
        cli::Commands::Plan(_) => "plan",
        cli::Commands::Completion(_) => "completion",
    };
    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet, operation);

    let result = match &cli.command {
        cli::Commands::Create(args) => {
            commands::create::execute(args, &*formatter, cli.verbose, cli.quiet || cli.json)
        }
        cli::Commands::Plan(args) => commands::plan::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}
