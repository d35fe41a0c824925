//! Error types for archive manager operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ManagerError`.
pub type Result<T> = std::result::Result<T, ManagerError>;

/// Exit status reported for configuration, capability and validation
/// failures.
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Errors raised while loading or validating the package configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O operation on a configuration file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that could not be read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A YAML document could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A non-default configuration file was requested but does not exist.
    #[error("config file '{path}' does not exist")]
    MissingFile {
        /// Requested path.
        path: PathBuf,
    },

    /// A path that must be a directory is something else.
    #[error("{what} '{path}' is not a directory")]
    NotADirectory {
        /// Human-readable name of the configured path.
        what: &'static str,
        /// Offending path.
        path: PathBuf,
    },

    /// The credentials file lacks a required key.
    #[error("credentials file '{path}' does not contain `{key}`")]
    MissingCredential {
        /// Credentials file.
        path: PathBuf,
        /// Dotted key that is missing.
        key: &'static str,
    },

    /// The package home could not be determined or does not exist.
    #[error("package home not found: {reason}")]
    HomeNotFound {
        /// Why resolution failed.
        reason: String,
    },
}

/// Reasons a timestamp range is rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRangeError {
    /// Lower bound is greater than the upper bound.
    #[error("begin-ts must be <= end-ts")]
    BeginAfterEnd {
        /// Lower bound.
        begin_ts: i64,
        /// Upper bound.
        end_ts: i64,
    },

    /// One of the bounds is negative.
    #[error("begin-ts and end-ts must be non-negative.")]
    Negative {
        /// Lower bound.
        begin_ts: i64,
        /// Upper bound.
        end_ts: i64,
    },
}

/// Errors that can occur during one archive manager invocation.
#[derive(Error, Debug)]
pub enum ManagerError {
    /// Configuration or credentials could not be loaded.
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),

    /// The configured archive storage cannot be managed from the host.
    #[error("archive deletion is not supported for storage type: {storage_type}")]
    UnsupportedStorage {
        /// Configured storage type.
        storage_type: String,
    },

    /// The requested timestamp range is invalid.
    #[error("invalid time range: {0}")]
    InvalidTimeRange(#[from] TimeRangeError),

    /// The container engine could not be started.
    #[error("failed to launch '{program}': {source}")]
    Launch {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The worker exited unsuccessfully.
    #[error("{}", worker_failure_message(.code))]
    WorkerFailed {
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },

    /// Host-side file handling failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[allow(clippy::ref_option)]
fn worker_failure_message(code: &Option<i32>) -> String {
    code.map_or_else(
        || "archive manager worker was terminated by a signal".to_string(),
        |code| format!("archive manager worker exited with status {code}"),
    )
}

impl ManagerError {
    /// Returns the exit status for failures that are reported and returned
    /// from `main`, or `None` for failures that abort the process.
    ///
    /// Config, capability and time-range failures all share
    /// [`FAILURE_EXIT_CODE`].
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Config(_) | Self::UnsupportedStorage { .. } | Self::InvalidTimeRange(_) => {
                Some(FAILURE_EXIT_CODE)
            }
            Self::Launch { .. } | Self::WorkerFailed { .. } | Self::Io(_) => None,
        }
    }

    /// Returns `true` if the failure happened after the worker was
    /// dispatched (or while dispatching it).
    pub const fn is_worker_failure(&self) -> bool {
        matches!(self, Self::Launch { .. } | Self::WorkerFailed { .. })
    }
}
