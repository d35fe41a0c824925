//! Host-side front-end for listing and deleting log archives.
//!
//! `archman-core` turns an [`ArchiveRequest`] into a worker invocation that
//! runs inside the package's execution container. It loads the package
//! configuration, refuses storage backends it cannot manage, validates time
//! ranges, writes a container-side copy of the configuration and runs the
//! worker to completion.
//!
//! # Examples
//!
//! ```no_run
//! use archman_core::ArchiveRequest;
//! use archman_core::FindRequest;
//! use archman_core::LaunchOptions;
//! use archman_core::ProcessLauncher;
//! use archman_core::run_archive_manager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = LaunchOptions::new("/opt/clp");
//! let request = ArchiveRequest::Find(FindRequest::default());
//! let report = run_archive_manager(&request, &options, &ProcessLauncher)?;
//! println!("ran {}", report.container_name);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod container;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod timestamps;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

pub use config::PackageConfig;
pub use config::StorageType;
pub use container::ContainerLaunchSpec;
pub use dispatch::DispatchReport;
pub use dispatch::LaunchOptions;
pub use dispatch::ProcessLauncher;
pub use dispatch::WorkerExit;
pub use dispatch::WorkerLauncher;
pub use dispatch::run_archive_manager;
pub use error::ConfigError;
pub use error::FAILURE_EXIT_CODE;
pub use error::ManagerError;
pub use error::Result;
pub use error::TimeRangeError;
pub use request::ArchiveRequest;
pub use request::DeleteRequest;
pub use request::DeleteTarget;
pub use request::FindRequest;
pub use request::WorkerSubcommand;
pub use timestamps::validate_time_range;
