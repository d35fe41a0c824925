//! Package configuration.
//!
//! The package configuration is a YAML file (by default
//! `<home>/etc/clp-config.yml`). Only the sections the archive manager needs
//! are typed; every other top-level section is carried through untouched so
//! that the configuration handed to the worker stays complete.

mod credentials;
mod home;

pub use credentials::DbCredentials;
pub use credentials::load_db_credentials;
pub use credentials::validate_and_load_db_credentials;
pub use home::DEFAULT_CONFIG_FILE_RELATIVE_PATH;
pub use home::HOME_ENV_VAR;
pub use home::default_config_path;
pub use home::resolve_home;
pub use home::resolve_home_from;

use crate::error::ConfigError;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_EXECUTION_CONTAINER: &str = "ghcr.io/y-scope/clp/clp-execution-x86-ubuntu-jammy:main";

/// Top-level package configuration.
///
/// # Examples
///
/// ```
/// use archman_core::PackageConfig;
/// use archman_core::StorageType;
///
/// let config = PackageConfig::default();
/// assert_eq!(config.archive_output.storage.storage_type(), StorageType::Fs);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Image the worker runs in.
    pub execution_container: String,

    /// Directory for package logs and generated files.
    pub logs_directory: PathBuf,

    /// Directory for package state.
    pub data_directory: PathBuf,

    /// Credentials file for the metadata database.
    pub credentials_file_path: PathBuf,

    /// Metadata database connection settings.
    pub database: DatabaseConfig,

    /// Where archives are written.
    pub archive_output: ArchiveOutput,

    /// Sections this crate does not interpret.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            execution_container: DEFAULT_EXECUTION_CONTAINER.to_string(),
            logs_directory: PathBuf::from("var/log"),
            data_directory: PathBuf::from("var/data"),
            credentials_file_path: PathBuf::from("etc/credentials.yml"),
            database: DatabaseConfig::default(),
            archive_output: ArchiveOutput::default(),
            other: BTreeMap::new(),
        }
    }
}

impl PackageConfig {
    /// Resolves every relative path against the package home.
    pub fn make_paths_absolute(&mut self, home: &Path) {
        absolutize(&mut self.logs_directory, home);
        absolutize(&mut self.data_directory, home);
        absolutize(&mut self.credentials_file_path, home);
        match &mut self.archive_output.storage {
            ArchiveStorage::Fs { directory, .. } => absolutize(directory, home),
            ArchiveStorage::S3 {
                staging_directory, ..
            } => absolutize(staging_directory, home),
        }
    }

    /// Checks that the logs directory is usable.
    ///
    /// A missing directory is accepted; it is created when the first file is
    /// written into it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotADirectory`] if the path exists but is not a
    /// directory.
    pub fn validate_logs_dir(&self) -> Result<(), ConfigError> {
        let path = &self.logs_directory;
        if path.exists() && !path.is_dir() {
            return Err(ConfigError::NotADirectory {
                what: "logs_directory",
                path: path.clone(),
            });
        }
        Ok(())
    }
}

fn absolutize(path: &mut PathBuf, home: &Path) {
    if path.is_relative() {
        *path = home.join(&*path);
    }
}

/// Metadata database connection settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database flavor, e.g. `mariadb`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Host name.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Database name.
    pub name: String,
    /// Connection settings this crate does not interpret (`ssl_cert`,
    /// `auto_commit` and so on).
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
    #[serde(skip)]
    credentials: Option<DbCredentials>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: "mariadb".to_string(),
            host: "localhost".to_string(),
            port: 3306,
            name: "clp-db".to_string(),
            other: BTreeMap::new(),
            credentials: None,
        }
    }
}

impl DatabaseConfig {
    /// Credentials attached by [`validate_and_load_db_credentials`].
    pub const fn credentials(&self) -> Option<&DbCredentials> {
        self.credentials.as_ref()
    }

    /// Attaches credentials. They are never serialized.
    pub fn set_credentials(&mut self, credentials: DbCredentials) {
        self.credentials = Some(credentials);
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("other", &self.other)
            .field("credentials", &self.credentials.is_some())
            .finish()
    }
}

/// Archive output settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveOutput {
    /// Storage backend for archives.
    pub storage: ArchiveStorage,

    /// Settings this crate does not interpret (archive sizing and so on).
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

/// Storage backend archives are persisted to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArchiveStorage {
    /// Plain filesystem directory.
    Fs {
        /// Archive directory.
        #[serde(default = "default_archives_directory")]
        directory: PathBuf,
        /// Backend settings this crate does not interpret.
        #[serde(flatten)]
        other: BTreeMap<String, serde_yaml::Value>,
    },
    /// Object storage, staged through a local directory.
    S3 {
        /// Local staging directory.
        #[serde(default = "default_staging_directory")]
        staging_directory: PathBuf,
        /// Bucket settings, passed through as-is.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        s3_config: Option<serde_yaml::Value>,
        /// Backend settings this crate does not interpret.
        #[serde(flatten)]
        other: BTreeMap<String, serde_yaml::Value>,
    },
}

fn default_archives_directory() -> PathBuf {
    PathBuf::from("var/data/archives")
}

fn default_staging_directory() -> PathBuf {
    PathBuf::from("var/data/staged-archives")
}

impl Default for ArchiveStorage {
    fn default() -> Self {
        Self::Fs {
            directory: default_archives_directory(),
            other: BTreeMap::new(),
        }
    }
}

impl ArchiveStorage {
    /// Returns the storage type.
    pub const fn storage_type(&self) -> StorageType {
        match self {
            Self::Fs { .. } => StorageType::Fs,
            Self::S3 { .. } => StorageType::S3,
        }
    }

    /// Returns the archive directory for filesystem storage.
    pub fn fs_directory(&self) -> Option<&Path> {
        match self {
            Self::Fs { directory, .. } => Some(directory.as_path()),
            Self::S3 { .. } => None,
        }
    }
}

/// Kind of archive storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// Plain filesystem.
    Fs,
    /// S3-compatible object storage.
    S3,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fs => f.write_str("fs"),
            Self::S3 => f.write_str("s3"),
        }
    }
}

/// Loads the package configuration.
///
/// If `path` exists it is parsed as YAML. A missing file is only accepted
/// when it is the default location, in which case built-in defaults are
/// used. Relative paths in the result are resolved against `home`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a
/// non-default path does not exist.
pub fn load_config(
    path: &Path,
    default_path: &Path,
    home: &Path,
) -> Result<PackageConfig, ConfigError> {
    let mut config = if path.exists() {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            PackageConfig::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        }
    } else if path == default_path {
        debug!(path = %path.display(), "default config file not found, using defaults");
        PackageConfig::default()
    } else {
        return Err(ConfigError::MissingFile {
            path: path.to_path_buf(),
        });
    };

    config.make_paths_absolute(home);
    Ok(config)
}
