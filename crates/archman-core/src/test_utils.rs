//! Test utilities for package homes and worker launches.
//!
//! # Panics
//!
//! Functions in this module panic on I/O errors since they are designed for
//! test use only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use crate::dispatch::WorkerExit;
use crate::dispatch::WorkerLauncher;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// Credentials file contents accepted by the loader.
pub const TEST_CREDENTIALS: &str = "database:\n  user: clp-user\n  password: clp-password\n";

/// Writes `etc/clp-config.yml` and `etc/credentials.yml` under `home`.
///
/// Returns the config file path.
pub fn write_package_home(home: &Path, config_yaml: &str) -> PathBuf {
    let etc = home.join("etc");
    fs::create_dir_all(&etc).unwrap();
    fs::write(etc.join("credentials.yml"), TEST_CREDENTIALS).unwrap();
    let config_path = etc.join("clp-config.yml");
    fs::write(&config_path, config_yaml).unwrap();
    config_path
}

/// Package config YAML with filesystem archive storage.
pub const FS_CONFIG: &str =
    "archive_output:\n  storage:\n    type: fs\n    directory: var/data/archives\n";

/// Package config YAML with S3 archive storage.
pub const S3_CONFIG: &str =
    "archive_output:\n  storage:\n    type: s3\n    s3_config:\n      bucket: archives\n";

/// Launcher that records every command instead of running it.
#[derive(Debug)]
pub struct RecordingLauncher {
    exit: WorkerExit,
    calls: RefCell<Vec<Vec<String>>>,
}

impl RecordingLauncher {
    /// Launcher whose worker always exits with `exit`.
    pub fn new(exit: WorkerExit) -> Self {
        Self {
            exit,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Launcher whose worker always succeeds.
    pub fn succeeding() -> Self {
        Self::new(WorkerExit::SUCCESS)
    }

    /// Commands launched so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl WorkerLauncher for RecordingLauncher {
    fn launch(&self, argv: &[String]) -> io::Result<WorkerExit> {
        self.calls.borrow_mut().push(argv.to_vec());
        Ok(self.exit)
    }
}
