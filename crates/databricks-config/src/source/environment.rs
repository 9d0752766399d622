//! Environment variable credential source

use std::env;

use tracing::debug;

use crate::error::ConfigResult;
use crate::record::DatabricksConfig;

use super::CredentialSource;

/// Environment variables read by [`EnvironmentSource`]
pub const HOST_ENV_VAR: &str = "DATABRICKS_HOST";
pub const USERNAME_ENV_VAR: &str = "DATABRICKS_USERNAME";
pub const PASSWORD_ENV_VAR: &str = "DATABRICKS_PASSWORD";
pub const TOKEN_ENV_VAR: &str = "DATABRICKS_TOKEN";
pub const REFRESH_TOKEN_ENV_VAR: &str = "DATABRICKS_REFRESH_TOKEN";
pub const INSECURE_ENV_VAR: &str = "DATABRICKS_INSECURE";
pub const JOBS_API_VERSION_ENV_VAR: &str = "DATABRICKS_JOBS_API_VERSION";

/// Credentials taken from `DATABRICKS_*` environment variables
///
/// The variables are read fresh on every attempt. A partial set that does not
/// amount to a usable credential pair is dropped without an error so that
/// resolution can continue down the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentSource;

impl EnvironmentSource {
    /// Create a source reading the process environment
    pub fn new() -> Self {
        Self
    }
}

impl CredentialSource for EnvironmentSource {
    fn name(&self) -> String {
        "environment".to_string()
    }

    fn attempt(&self) -> ConfigResult<Option<DatabricksConfig>> {
        let config = DatabricksConfig {
            host: env::var(HOST_ENV_VAR).ok(),
            username: env::var(USERNAME_ENV_VAR).ok(),
            password: env::var(PASSWORD_ENV_VAR).ok(),
            token: env::var(TOKEN_ENV_VAR).ok(),
            refresh_token: env::var(REFRESH_TOKEN_ENV_VAR).ok(),
            insecure: env::var(INSECURE_ENV_VAR).ok(),
            jobs_api_version: env::var(JOBS_API_VERSION_ENV_VAR).ok(),
        };

        if config.is_valid() {
            debug!("resolved credentials from environment variables");
            Ok(Some(config))
        } else {
            if config != DatabricksConfig::empty() {
                debug!("ignoring incomplete credential set from environment variables");
            }
            Ok(None)
        }
    }
}
