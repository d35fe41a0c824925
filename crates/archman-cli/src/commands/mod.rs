//! Subcommand implementations.

pub mod completion;
pub mod del;
pub mod find;

use crate::cli::Cli;
use crate::error::convert_manager_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use archman_core::ArchiveRequest;
use archman_core::FAILURE_EXIT_CODE;
use archman_core::LaunchOptions;
use archman_core::ProcessLauncher;
use archman_core::config::resolve_home;
use archman_core::run_archive_manager;
use std::env;
use std::process::ExitCode;
use tracing::error;

/// Environment variable overriding the container engine binary.
pub const CONTAINER_ENGINE_ENV_VAR: &str = "ARCHMAN_CONTAINER_ENGINE";

/// Runs `request` in the worker container and reports the outcome.
///
/// Config, capability and validation failures are already logged by the
/// core and end with the shared failure status. Worker failures are
/// returned as errors.
pub fn run(
    request: &ArchiveRequest,
    cli: &Cli,
    formatter: &dyn OutputFormatter,
) -> Result<ExitCode> {
    let operation = request.subcommand().as_str();

    let options = match launch_options(cli) {
        Ok(options) => options,
        Err(err) => {
            error!("Failed to load config: {err}");
            formatter.format_failure(operation, &err.to_string());
            return Ok(exit_code(FAILURE_EXIT_CODE));
        }
    };

    match run_archive_manager(request, &options, &ProcessLauncher) {
        Ok(report) => {
            formatter.format_dispatch_report(&report)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            formatter.format_failure(operation, &err.to_string());
            match err.exit_code() {
                Some(code) => Ok(exit_code(code)),
                None => Err(convert_manager_error(err)),
            }
        }
    }
}

fn launch_options(cli: &Cli) -> Result<LaunchOptions, archman_core::ConfigError> {
    let home = resolve_home()?;
    let mut options = LaunchOptions::new(home);
    if let Some(path) = &cli.config {
        options = options.with_config_path(path);
    }
    if let Some(engine) = env::var_os(CONTAINER_ENGINE_ENV_VAR).filter(|value| !value.is_empty()) {
        options = options.with_container_engine(engine.to_string_lossy());
    }
    Ok(options)
}

/// Maps a status such as `-1` onto the byte the OS reports (`255`).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code as u8)
}
