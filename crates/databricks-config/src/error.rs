//! Error types for credential resolution

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for credential resolution operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main error type for credential resolution
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No source in the chain produced a usable credential set
    #[error("{}", not_configured_message(.profile))]
    NotConfigured { profile: Option<String> },

    /// An installed override source declined to produce a configuration
    #[error("custom credential source `{provider}` returned no DatabricksConfig")]
    OverrideReturnedNothing { provider: String },

    /// Reading or writing the profile file failed
    #[error("failed to access profile file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile file exists but is not well-formed
    #[error("malformed profile file {} at line {}: {}", .path.display(), .line, .message)]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The profiles hold an entry the line-oriented file format cannot carry
    #[error("cannot save profile file {}: {}", .path.display(), .reason)]
    Unwritable { path: PathBuf, reason: String },
}

impl ConfigError {
    /// Create a new not-configured error for the given profile
    pub fn not_configured(profile: Option<&str>) -> Self {
        Self::NotConfigured {
            profile: profile.map(str::to_string),
        }
    }

    /// Create a new error for an override source that yielded nothing
    pub fn override_returned_nothing(provider: impl Into<String>) -> Self {
        Self::OverrideReturnedNothing {
            provider: provider.into(),
        }
    }

    /// Create a new I/O error tagged with the profile file path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new parse error tagged with the offending line
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a new error for profiles that cannot be rendered to disk
    pub fn unwritable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Unwritable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn not_configured_message(profile: &Option<String>) -> String {
    match profile {
        Some(name) => format!(
            "You haven't configured the CLI yet for the profile {name}! \
             Please configure by entering `databricks configure --profile {name}`"
        ),
        None => "You haven't configured the CLI yet! \
                 Please configure by entering `databricks configure`"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_names_the_profile() {
        let err = ConfigError::not_configured(Some("dev"));
        let text = err.to_string();
        assert!(text.contains("--profile dev"));

        let err = ConfigError::not_configured(None);
        let text = err.to_string();
        assert!(text.contains("`databricks configure`"));
        assert!(!text.contains("--profile"));
    }

    #[test]
    fn parse_error_reports_location() {
        let err = ConfigError::parse("/tmp/cfg", 3, "expected `key = value`");
        let text = err.to_string();
        assert!(text.contains("/tmp/cfg"));
        assert!(text.contains("line 3"));
    }
}
