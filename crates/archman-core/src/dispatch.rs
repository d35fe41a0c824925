//! Running an archive manager request end to end.
//!
//! A request goes through
//! `LoadConfig -> ValidateCapability -> ValidateDomainArgs ->
//! BuildContainerSpec -> Dispatch -> Cleanup`. Any stage failure is logged
//! and returned immediately; nothing is retried.

use crate::config::PackageConfig;
use crate::config::StorageType;
use crate::config::default_config_path;
use crate::config::load_config;
use crate::config::validate_and_load_db_credentials;
use crate::container::ContainerLaunchSpec;
use crate::error::ConfigError;
use crate::error::ManagerError;
use crate::error::Result;
use crate::request::ArchiveRequest;
use crate::request::WorkerSubcommand;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::info_span;

/// Container engine used when none is configured.
pub const DEFAULT_CONTAINER_ENGINE: &str = "docker";

/// How the worker exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerExit {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl WorkerExit {
    /// Exit with status 0.
    pub const SUCCESS: Self = Self { code: Some(0) };

    /// Returns `true` if the worker exited with status 0.
    pub const fn success(self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Starts the worker command and waits for it to finish.
pub trait WorkerLauncher {
    /// Runs `argv` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    fn launch(&self, argv: &[String]) -> io::Result<WorkerExit>;
}

/// Runs the worker as a child process with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl WorkerLauncher for ProcessLauncher {
    fn launch(&self, argv: &[String]) -> io::Result<WorkerExit> {
        let Some((program, args)) = argv.split_first() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty worker command",
            ));
        };
        let status = Command::new(program).args(args).status()?;
        Ok(WorkerExit {
            code: status.code(),
        })
    }
}

/// Host-side settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Package home.
    pub home: PathBuf,
    /// Configuration file to load.
    pub config_path: PathBuf,
    /// Default configuration location; a missing file here means defaults.
    pub default_config_path: PathBuf,
    /// Container engine binary.
    pub container_engine: String,
}

impl LaunchOptions {
    /// Options using the default configuration location under `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let default_config_path = default_config_path(&home);
        Self {
            config_path: default_config_path.clone(),
            default_config_path,
            home,
            container_engine: DEFAULT_CONTAINER_ENGINE.to_string(),
        }
    }

    /// Overrides the configuration file.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Overrides the container engine binary.
    #[must_use]
    pub fn with_container_engine(mut self, engine: impl Into<String>) -> Self {
        self.container_engine = engine.into();
        self
    }
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Worker subcommand that ran.
    pub subcommand: WorkerSubcommand,
    /// Container name.
    pub container_name: String,
    /// Full command line that was executed.
    pub command: Vec<String>,
    /// Generated config file that was removed.
    pub removed_config: PathBuf,
}

/// Loads the package configuration and database credentials.
///
/// Credentials are only checked for presence; they are not attached to the
/// returned config.
///
/// # Errors
///
/// Returns the first configuration problem found.
pub fn load_package_config(
    options: &LaunchOptions,
) -> std::result::Result<PackageConfig, ConfigError> {
    let mut config = load_config(
        &options.config_path,
        &options.default_config_path,
        &options.home,
    )?;
    config.validate_logs_dir()?;
    validate_and_load_db_credentials(&mut config, &options.home, false)?;
    Ok(config)
}

/// Fails unless archives are stored on the plain filesystem.
///
/// # Errors
///
/// Returns [`ManagerError::UnsupportedStorage`] for any other backend.
pub fn check_storage_capability(config: &PackageConfig) -> Result<()> {
    let storage_type = config.archive_output.storage.storage_type();
    if storage_type != StorageType::Fs {
        return Err(ManagerError::UnsupportedStorage {
            storage_type: storage_type.to_string(),
        });
    }
    Ok(())
}

/// Runs `request` against the package described by `options`.
///
/// # Errors
///
/// Returns a [`ManagerError`] for the first failing stage. Every error is
/// logged before it is returned.
pub fn run_archive_manager(
    request: &ArchiveRequest,
    options: &LaunchOptions,
    launcher: &dyn WorkerLauncher,
) -> Result<DispatchReport> {
    let span = info_span!("archive_manager", subcommand = %request.subcommand());
    let _enter = span.enter();

    let config = load_package_config(options).map_err(|err| {
        error!(path = %options.config_path.display(), "Failed to load config: {err}");
        ManagerError::from(err)
    })?;

    check_storage_capability(&config).inspect_err(|err| error!("{err}"))?;

    request.validate().map_err(|err| {
        error!("{err}");
        ManagerError::from(err)
    })?;

    let spec = ContainerLaunchSpec::build(&config, &options.home, &options.container_engine)
        .inspect_err(|err| error!("Failed to prepare worker container: {err}"))?;

    dispatch(request, &spec, launcher)
}

/// Runs the worker for `request` inside the container described by `spec`
/// and removes the generated config once it succeeds.
///
/// The generated config is left in place when the worker fails.
///
/// # Errors
///
/// Returns [`ManagerError::Launch`] if the engine cannot be started and
/// [`ManagerError::WorkerFailed`] if the worker exits unsuccessfully.
pub fn dispatch(
    request: &ArchiveRequest,
    spec: &ContainerLaunchSpec,
    launcher: &dyn WorkerLauncher,
) -> Result<DispatchReport> {
    let command = spec.command_line(request.worker_args(&spec.container_config_path));
    info!(container = %spec.name, "Starting archive manager worker");
    debug!(command = %command.join(" "));

    let exit = launcher.launch(&command).map_err(|source| {
        let program = command.first().cloned().unwrap_or_default();
        error!("Failed to launch '{program}': {source}");
        ManagerError::Launch { program, source }
    })?;

    if !exit.success() {
        let err = ManagerError::WorkerFailed { code: exit.code };
        error!(config = %spec.host_config_path.display(), "{err}");
        return Err(err);
    }

    spec.cleanup()
        .inspect_err(|err| error!("Failed to remove generated config: {err}"))?;
    info!(container = %spec.name, "Archive manager worker finished");

    Ok(DispatchReport {
        subcommand: request.subcommand(),
        container_name: spec.name.clone(),
        command,
        removed_config: spec.host_config_path.clone(),
    })
}
