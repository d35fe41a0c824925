//! Container launch specification for the archive manager worker.
//!
//! The worker runs inside the package's execution container. Host paths it
//! needs are bind-mounted, and a copy of the package configuration rewritten
//! for container-side paths is written next to the host logs.

use crate::config::ArchiveStorage;
use crate::config::PackageConfig;
use crate::error::ManagerError;
use crate::error::Result;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Package home inside the container.
pub const CONTAINER_HOME: &str = "/opt/clp";

const CONTAINER_LOGS_DIR: &str = "/var/log";
const CONTAINER_DATA_DIR: &str = "/var/data";
const CONTAINER_ARCHIVE_OUTPUT_DIR: &str = "/mnt/archive-output";

/// Job name used for archive manager containers.
pub const ARCHIVE_MANAGER_JOB: &str = "archive-manager";

/// A bind mount from the host into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    /// Host path.
    pub src: PathBuf,
    /// Container path.
    pub dst: PathBuf,
    /// Mount read-only.
    pub read_only: bool,
}

impl Mount {
    /// Creates a read-write bind mount.
    pub fn bind(src: impl Into<PathBuf>, dst: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            read_only: false,
        }
    }

    /// Formats the mount as a `--mount` option value.
    pub fn to_arg(&self) -> String {
        let mut arg = format!(
            "type=bind,src={},dst={}",
            self.src.display(),
            self.dst.display()
        );
        if self.read_only {
            arg.push_str(",readonly");
        }
        arg
    }
}

/// Mounts the worker may need.
///
/// A directory that lives inside the package home needs no mount of its own
/// and is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerMounts {
    /// Package home.
    pub home: Mount,
    /// Logs directory.
    pub logs_dir: Option<Mount>,
    /// Data directory.
    pub data_dir: Option<Mount>,
    /// Archive output directory (filesystem storage only).
    pub archives_output_dir: Option<Mount>,
}

impl ContainerMounts {
    /// Mounts required by the archive manager: home, logs and archive
    /// output.
    pub fn archive_manager_mounts(&self) -> Vec<Mount> {
        std::iter::once(self.home.clone())
            .chain(self.logs_dir.clone())
            .chain(self.archives_output_dir.clone())
            .collect()
    }
}

/// Generates a container name of the form `clp-<job>-<4 hex chars>`.
pub fn generate_container_name(job: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("clp-{job}-{}", &id[id.len() - 4..])
}

/// Maps a host path to its container path, returning the mount needed for
/// it when it is not already visible through the home mount.
fn map_into_container(
    host_path: &Path,
    home: &Path,
    container_dir: &str,
) -> (PathBuf, Option<Mount>) {
    match host_path.strip_prefix(home) {
        Ok(relative) => (Path::new(CONTAINER_HOME).join(relative), None),
        Err(_) => (
            PathBuf::from(container_dir),
            Some(Mount::bind(host_path, container_dir)),
        ),
    }
}

/// Rewrites `config` for use inside the container and lists the mounts that
/// make its paths valid there.
pub fn generate_container_config(
    config: &PackageConfig,
    home: &Path,
) -> (PackageConfig, ContainerMounts) {
    let mut container_config = config.clone();

    let (logs_directory, logs_dir) =
        map_into_container(&config.logs_directory, home, CONTAINER_LOGS_DIR);
    container_config.logs_directory = logs_directory;

    let (data_directory, data_dir) =
        map_into_container(&config.data_directory, home, CONTAINER_DATA_DIR);
    container_config.data_directory = data_directory;

    if let Ok(relative) = config.credentials_file_path.strip_prefix(home) {
        container_config.credentials_file_path = Path::new(CONTAINER_HOME).join(relative);
    }

    let archives_output_dir = match &mut container_config.archive_output.storage {
        ArchiveStorage::Fs { directory, .. } => {
            let (container_dir, mount) =
                map_into_container(directory, home, CONTAINER_ARCHIVE_OUTPUT_DIR);
            *directory = container_dir;
            mount
        }
        ArchiveStorage::S3 { .. } => None,
    };

    let mounts = ContainerMounts {
        home: Mount::bind(home, CONTAINER_HOME),
        logs_dir,
        data_dir,
        archives_output_dir,
    };
    (container_config, mounts)
}

/// Writes `container_config` into the host logs directory.
///
/// Returns `(container_path, host_path)` of the generated file.
///
/// # Errors
///
/// Returns an error if the logs directory cannot be created or the file
/// cannot be written.
pub fn dump_container_config(
    container_config: &PackageConfig,
    host_config: &PackageConfig,
    container_name: &str,
) -> Result<(PathBuf, PathBuf)> {
    let file_name = format!(".{container_name}-config.yml");
    let host_path = host_config.logs_directory.join(&file_name);
    let container_path = container_config.logs_directory.join(&file_name);

    let yaml = serde_yaml::to_string(container_config).map_err(io::Error::other)?;
    fs::create_dir_all(&host_config.logs_directory)?;
    fs::write(&host_path, yaml)?;
    debug!(path = %host_path.display(), "wrote container config");

    Ok((container_path, host_path))
}

/// Builds the command prefix that starts the worker container.
pub fn generate_container_start_cmd(
    container_name: &str,
    mounts: &[Mount],
    image: &str,
    engine: &str,
) -> Vec<String> {
    let mut cmd: Vec<String> = vec![
        engine.to_string(),
        "run".to_string(),
        "-i".to_string(),
        "--rm".to_string(),
        "--network".to_string(),
        "host".to_string(),
        "-w".to_string(),
        CONTAINER_HOME.to_string(),
        "-e".to_string(),
        format!("PYTHONPATH={CONTAINER_HOME}/lib/python3/site-packages"),
        "-e".to_string(),
        format!("CLP_HOME={CONTAINER_HOME}"),
    ];
    if let Some(user) = host_user() {
        cmd.push("-u".to_string());
        cmd.push(user);
    }
    cmd.extend([
        "--name".to_string(),
        container_name.to_string(),
        "--log-driver".to_string(),
        "local".to_string(),
    ]);
    for mount in mounts {
        cmd.push("--mount".to_string());
        cmd.push(mount.to_arg());
    }
    cmd.push(image.to_string());
    cmd
}

/// `uid:gid` of the current process so files written by the worker stay
/// owned by the invoking user.
#[cfg(target_os = "linux")]
fn host_user() -> Option<String> {
    use std::os::unix::fs::MetadataExt;

    let meta = fs::metadata("/proc/self").ok()?;
    Some(format!("{}:{}", meta.uid(), meta.gid()))
}

#[cfg(not(target_os = "linux"))]
fn host_user() -> Option<String> {
    None
}

/// Everything needed to start one worker container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerLaunchSpec {
    /// Container name.
    pub name: String,
    /// Generated config file as seen from inside the container.
    pub container_config_path: PathBuf,
    /// Generated config file on the host, removed after a successful run.
    pub host_config_path: PathBuf,
    /// Bind mounts passed to the engine.
    pub mounts: Vec<Mount>,
    /// Command prefix that starts the container.
    pub start_cmd: Vec<String>,
}

impl ContainerLaunchSpec {
    /// Generates a container name, writes the container-side config and
    /// assembles the start command.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated config cannot be written.
    pub fn build(config: &PackageConfig, home: &Path, engine: &str) -> Result<Self> {
        let name = generate_container_name(ARCHIVE_MANAGER_JOB);
        let (container_config, mounts) = generate_container_config(config, home);
        let (container_config_path, host_config_path) =
            dump_container_config(&container_config, config, &name)?;

        let mounts = mounts.archive_manager_mounts();
        let start_cmd =
            generate_container_start_cmd(&name, &mounts, &config.execution_container, engine);

        Ok(Self {
            name,
            container_config_path,
            host_config_path,
            mounts,
            start_cmd,
        })
    }

    /// Full command line: start command followed by `worker_args`.
    pub fn command_line(&self, worker_args: Vec<String>) -> Vec<String> {
        let mut cmd = self.start_cmd.clone();
        cmd.extend(worker_args);
        cmd
    }

    /// Removes the host-side generated config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub fn cleanup(&self) -> Result<()> {
        fs::remove_file(&self.host_config_path).map_err(ManagerError::Io)
    }
}
