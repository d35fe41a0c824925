//! Find command implementation.

use crate::cli::Cli;
use crate::cli::FindArgs;
use crate::output::OutputFormatter;
use anyhow::Result;
use archman_core::ArchiveRequest;
use archman_core::FindRequest;
use std::process::ExitCode;

pub fn execute(args: &FindArgs, cli: &Cli, formatter: &dyn OutputFormatter) -> Result<ExitCode> {
    super::run(&request(args), cli, formatter)
}

fn request(args: &FindArgs) -> ArchiveRequest {
    ArchiveRequest::Find(FindRequest {
        begin_ts: args.begin_ts,
        end_ts: args.end_ts,
    })
}
