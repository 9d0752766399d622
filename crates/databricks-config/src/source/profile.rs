//! Profile file credential source

use tracing::debug;

use crate::error::ConfigResult;
use crate::record::DatabricksConfig;
use crate::store::{
    self, ProfileStore, HOST_KEY, INSECURE_KEY, JOBS_API_VERSION_KEY, PASSWORD_KEY,
    REFRESH_TOKEN_KEY, TOKEN_KEY, USERNAME_KEY,
};

use super::CredentialSource;

/// Credentials read from one section of the profile store
///
/// The store is re-read on every attempt, so edits to the profile file are
/// picked up without rebuilding the source. A section that is missing or
/// does not hold a usable credential pair yields nothing.
#[derive(Debug, Clone)]
pub struct ProfileSource {
    store: ProfileStore,
    profile: String,
}

impl ProfileSource {
    /// Create a source reading the `DEFAULT` profile from the default store
    pub fn new() -> Self {
        Self::for_profile(store::DEFAULT_SECTION)
    }

    /// Create a source reading a named profile from the default store
    pub fn for_profile(profile: impl Into<String>) -> Self {
        Self::with_store(ProfileStore::new(), profile)
    }

    /// Create a source reading a named profile from a specific store
    pub fn with_store(store: ProfileStore, profile: impl Into<String>) -> Self {
        Self {
            store,
            profile: profile.into(),
        }
    }

    /// The profile section this source reads
    pub fn profile(&self) -> &str {
        &self.profile
    }
}

impl Default for ProfileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for ProfileSource {
    fn name(&self) -> String {
        format!("profile `{}`", self.profile)
    }

    fn attempt(&self) -> ConfigResult<Option<DatabricksConfig>> {
        let profiles = self.store.load()?;
        let read = |key: &str| profiles.get(&self.profile, key).map(str::to_string);

        let config = DatabricksConfig {
            host: read(HOST_KEY),
            username: read(USERNAME_KEY),
            password: read(PASSWORD_KEY),
            token: read(TOKEN_KEY),
            refresh_token: read(REFRESH_TOKEN_KEY),
            insecure: read(INSECURE_KEY),
            jobs_api_version: read(JOBS_API_VERSION_KEY),
        };

        if config.is_valid() {
            debug!("resolved credentials from profile `{}`", self.profile);
            Ok(Some(config))
        } else {
            Ok(None)
        }
    }
}
