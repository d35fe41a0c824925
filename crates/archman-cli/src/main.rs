//! archive-manager - Command-line utility for viewing and deleting log
//! archives through the package's worker container.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();

    logging::init(cli.verbose, cli.quiet);
    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match &cli.command {
        cli::Commands::Find(args) => commands::find::execute(args, &cli, &*formatter),
        cli::Commands::Del(args) => commands::del::execute(args, &cli, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(ExitCode::SUCCESS)
        }
    }
}
