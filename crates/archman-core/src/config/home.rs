//! Package home resolution.

use crate::error::ConfigError;
use std::env;
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// Environment variable naming the package home.
pub const HOME_ENV_VAR: &str = "CLP_HOME";

/// Location of the package configuration file relative to the home.
pub const DEFAULT_CONFIG_FILE_RELATIVE_PATH: &str = "etc/clp-config.yml";

/// Returns the default configuration file path for `home`.
pub fn default_config_path(home: &Path) -> PathBuf {
    home.join(DEFAULT_CONFIG_FILE_RELATIVE_PATH)
}

/// Determines the package home from `CLP_HOME` or the running executable.
///
/// # Errors
///
/// Returns [`ConfigError::HomeNotFound`] if neither source yields an
/// existing directory.
pub fn resolve_home() -> Result<PathBuf, ConfigError> {
    resolve_home_from(env::var_os(HOME_ENV_VAR), env::current_exe())
}

/// Determines the package home from an explicit `CLP_HOME` value, falling
/// back to `<exe dir>/..` (executables live in `<home>/bin`).
///
/// # Errors
///
/// Returns [`ConfigError::HomeNotFound`] if the home cannot be determined
/// or does not exist.
pub fn resolve_home_from(
    env_value: Option<OsString>,
    current_exe: io::Result<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    let home = match env_value.filter(|value| !value.is_empty()) {
        Some(value) => PathBuf::from(value),
        None => {
            let exe = current_exe.map_err(|err| ConfigError::HomeNotFound {
                reason: format!(
                    "{HOME_ENV_VAR} is not set and the executable path is unknown: {err}"
                ),
            })?;
            exe.parent()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .ok_or_else(|| ConfigError::HomeNotFound {
                    reason: format!(
                        "{HOME_ENV_VAR} is not set and could not be determined automatically"
                    ),
                })?
        }
    };

    if !home.is_dir() {
        return Err(ConfigError::HomeNotFound {
            reason: format!("'{}' does not exist", home.display()),
        });
    }

    home.canonicalize().map_err(|source| ConfigError::Io { path: home, source })
}
