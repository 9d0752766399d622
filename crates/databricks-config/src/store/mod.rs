//! Profile store
//!
//! On-disk persistence for Databricks credential profiles. The store lives at
//! `~/.databrickscfg` unless `DATABRICKS_CONFIG_FILE` points somewhere else,
//! and the location is resolved again on every operation so a change to the
//! environment takes effect immediately. The file is kept readable and
//! writable by its owner only.

mod raw;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

pub use raw::RawProfiles;

/// Environment variable overriding the profile file location
pub const CONFIG_FILE_ENV_VAR: &str = "DATABRICKS_CONFIG_FILE";

/// File name of the profile store under the home directory
pub const DEFAULT_CONFIG_FILE_NAME: &str = ".databrickscfg";

/// Name of the profile used when none is given
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Option names recognized within a profile section
pub const HOST_KEY: &str = "host";
pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";
pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const INSECURE_KEY: &str = "insecure";
pub const JOBS_API_VERSION_KEY: &str = "jobs-api-version";

/// Resolve where the profile file lives right now
///
/// `DATABRICKS_CONFIG_FILE` wins when set to a non-blank value and is used
/// exactly as given; otherwise the file sits in the user's home directory.
/// When no home directory can be resolved at all, an absolute temp path is
/// used rather than writing into the current working directory.
pub fn locate_store_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_FILE_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    match user_home_dir() {
        Some(home) => home.join(DEFAULT_CONFIG_FILE_NAME),
        None => std::env::temp_dir().join(DEFAULT_CONFIG_FILE_NAME),
    }
}

/// Best-effort home directory resolution.
///
/// `dirs::home_dir()` can return `None` in some service and test
/// environments, so fall back to the common environment variables.
fn user_home_dir() -> Option<PathBuf> {
    dirs::home_dir()
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
}

/// Handle to the profile file
///
/// A store built with [`ProfileStore::new`] follows [`locate_store_path`] on
/// every load and save. A store built with [`ProfileStore::at_path`] is
/// pinned to one file, which keeps tests away from the real environment.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    path: Option<PathBuf>,
}

impl ProfileStore {
    /// Create a store that resolves its location per operation
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Create a store pinned to an explicit file path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// The path this store would use for an operation right now
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => locate_store_path(),
        }
    }

    /// Load the profile file, treating a missing file as empty
    pub fn load(&self) -> ConfigResult<RawProfiles> {
        let path = self.resolved_path();
        match fs::read_to_string(&path) {
            Ok(text) => RawProfiles::parse(&text, &path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(RawProfiles::new()),
            Err(err) => Err(ConfigError::io(path, err)),
        }
    }

    /// Write the full profile file back to disk
    ///
    /// Profiles the line-oriented format cannot carry (a line break in a
    /// section name, key, or value, or a blank section name) are rejected
    /// before the file is touched, so a failed save never leaves the store
    /// unreadable. Missing parent directories are created first. A file
    /// that does not exist yet is created with owner-only permissions, and
    /// an existing file with wider permissions is tightened back to `0600`
    /// before its contents are replaced. The whole file is rewritten on
    /// every save; the last writer wins.
    pub fn save(&self, profiles: &RawProfiles) -> ConfigResult<()> {
        let path = self.resolved_path();
        if let Some(reason) = profiles.unwritable_reason() {
            return Err(ConfigError::unwritable(path, reason));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| ConfigError::io(&path, err))?;
            }
        }
        if !path.exists() {
            create_private(&path).map_err(|err| ConfigError::io(&path, err))?;
        }
        reset_permissions(&path).map_err(|err| ConfigError::io(&path, err))?;
        fs::write(&path, profiles.to_string()).map_err(|err| ConfigError::io(&path, err))?;
        debug!("saved profile store to {}", path.display());
        Ok(())
    }
}

fn create_private(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .mode(0o600)
            .open(path)?;
    }
    #[cfg(not(unix))]
    {
        fs::OpenOptions::new().write(true).create(true).open(path)?;
    }
    Ok(())
}

fn reset_permissions(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(path)?.permissions().mode();
        if mode & 0o7777 != 0o600 {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
