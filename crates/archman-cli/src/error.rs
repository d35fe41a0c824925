//! Error conversion utilities for CLI.
//!
//! Converts archman-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use crate::commands::CONTAINER_ENGINE_ENV_VAR;
use anyhow::anyhow;
use archman_core::ManagerError;

/// Converts `ManagerError` to a user-friendly anyhow error with context.
pub fn convert_manager_error(err: ManagerError) -> anyhow::Error {
    match err {
        ManagerError::WorkerFailed { code: Some(code) } => {
            anyhow!(
                "Archive manager worker failed with exit status {code}\n\
                 HINT: See the worker output above. The generated config file was kept in the \
                 logs directory."
            )
        }
        ManagerError::WorkerFailed { code: None } => {
            anyhow!(
                "Archive manager worker was terminated by a signal\n\
                 HINT: The generated config file was kept in the logs directory."
            )
        }
        ManagerError::Launch { program, source } => {
            anyhow!(
                "Failed to start container engine '{program}': {source}\n\
                 HINT: Install '{program}' or set {CONTAINER_ENGINE_ENV_VAR} to another engine."
            )
        }
        _ => anyhow::Error::from(err).context("Archive manager failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_convert_worker_failure() {
        let converted = convert_manager_error(ManagerError::WorkerFailed { code: Some(2) });
        let msg = format!("{converted:?}");
        assert!(msg.contains("exit status 2"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_launch_failure() {
        let converted = convert_manager_error(ManagerError::Launch {
            program: "docker".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        });
        let msg = format!("{converted:?}");
        assert!(msg.contains("'docker'"));
        assert!(msg.contains(CONTAINER_ENGINE_ENV_VAR));
    }

    #[test]
    fn test_convert_io_error_keeps_context() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let converted = convert_manager_error(ManagerError::Io(io_err));
        let msg = format!("{converted:?}");
        assert!(msg.contains("Archive manager failed"));
        assert!(msg.contains("denied"));
    }
}
