//! Metadata database credentials.

use super::PackageConfig;
use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Database user name and password.
#[derive(Clone, PartialEq, Eq)]
pub struct DbCredentials {
    user: String,
    password: String,
}

impl DbCredentials {
    /// Creates credentials from a user name and password.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Database user name.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Database password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCredentials")
            .field("user", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    database: Option<DatabaseSection>,
}

#[derive(Deserialize)]
struct DatabaseSection {
    user: Option<String>,
    password: Option<String>,
}

/// Reads the database credentials named by `config.credentials_file_path`.
///
/// A relative credentials path is resolved against `home`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if
/// `database.user` or `database.password` is missing.
pub fn load_db_credentials(
    config: &PackageConfig,
    home: &Path,
) -> Result<DbCredentials, ConfigError> {
    let path = home.join(&config.credentials_file_path);
    if !path.exists() {
        return Err(ConfigError::MissingFile { path });
    }

    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let parsed: CredentialsFile =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

    let Some(database) = parsed.database else {
        return Err(ConfigError::MissingCredential {
            path,
            key: "database",
        });
    };
    let Some(user) = database.user else {
        return Err(ConfigError::MissingCredential {
            path,
            key: "database.user",
        });
    };
    let Some(password) = database.password else {
        return Err(ConfigError::MissingCredential {
            path,
            key: "database.password",
        });
    };

    Ok(DbCredentials { user, password })
}

/// Loads the database credentials and, if `write_back` is set, attaches
/// them to `config.database`.
///
/// # Errors
///
/// See [`load_db_credentials`].
pub fn validate_and_load_db_credentials(
    config: &mut PackageConfig,
    home: &Path,
    write_back: bool,
) -> Result<(), ConfigError> {
    let credentials = load_db_credentials(config, home)?;
    if write_back {
        config.database.set_credentials(credentials);
    }
    Ok(())
}
