//! Delete command implementation.

use crate::cli::Cli;
use crate::cli::DelArgs;
use crate::cli::DelCommands;
use crate::output::OutputFormatter;
use anyhow::Result;
use archman_core::ArchiveRequest;
use archman_core::DeleteRequest;
use archman_core::DeleteTarget;
use std::process::ExitCode;
use tracing::info;

pub fn execute(args: &DelArgs, cli: &Cli, formatter: &dyn OutputFormatter) -> Result<ExitCode> {
    if args.dry_run {
        info!("Dry run requested; the worker will only preview deletions");
    }
    super::run(&request(args), cli, formatter)
}

fn request(args: &DelArgs) -> ArchiveRequest {
    let target = match &args.target {
        DelCommands::ByIds(by_ids) => DeleteTarget::ByIds(by_ids.ids.clone()),
        DelCommands::ByFilter(by_filter) => DeleteTarget::ByFilter {
            begin_ts: by_filter.begin_ts,
            end_ts: by_filter.end_ts,
        },
    };
    ArchiveRequest::Delete(DeleteRequest {
        dry_run: args.dry_run,
        target,
    })
}
