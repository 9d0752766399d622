//! Credential resolution
//!
//! Ties the credential sources together. The resolver walks task context,
//! environment variables, and the `DEFAULT` profile in that order and hands
//! back the first valid credential set; an installed override source
//! preempts the chain entirely. Profile-directed lookup and persistence
//! live here as well.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::record::DatabricksConfig;
use crate::source::{
    CredentialSource, EnvironmentSource, ProfileSource, TaskContext, TaskContextSource,
};
use crate::store::{
    ProfileStore, DEFAULT_SECTION, HOST_KEY, INSECURE_KEY, JOBS_API_VERSION_KEY, PASSWORD_KEY,
    REFRESH_TOKEN_KEY, TOKEN_KEY, USERNAME_KEY,
};

/// Resolves Databricks credentials from an ordered chain of sources
///
/// A fresh resolver consults the real environment: the process task context
/// (when a handle is installed), `DATABRICKS_*` variables, and the profile
/// store on disk. Both the store and the task context can be injected, which
/// is how tests and embedders redirect the chain.
pub struct ConfigResolver {
    store: ProfileStore,
    task_context: Option<Arc<dyn TaskContext>>,
    override_source: Option<Box<dyn CredentialSource>>,
}

impl ConfigResolver {
    /// Create a resolver over the default profile store
    pub fn new() -> Self {
        Self {
            store: ProfileStore::new(),
            task_context: None,
            override_source: None,
        }
    }

    /// Use a specific profile store instead of the located one
    pub fn with_store(mut self, store: ProfileStore) -> Self {
        self.store = store;
        self
    }

    /// Install the hosting runtime's task context handle
    pub fn with_task_context(mut self, context: Arc<dyn TaskContext>) -> Self {
        self.task_context = Some(context);
        self
    }

    /// Install or clear an override source
    ///
    /// While an override is installed it is the only source consulted.
    pub fn set_override(&mut self, source: Option<Box<dyn CredentialSource>>) {
        self.override_source = source;
    }

    /// The currently installed override source, if any
    pub fn override_source(&self) -> Option<&dyn CredentialSource> {
        self.override_source.as_deref()
    }

    /// Resolve credentials for API access
    ///
    /// With an override installed, its record is returned without a validity
    /// check, and an override that yields nothing is an error rather than a
    /// fallthrough. Otherwise the chain runs in order and the first valid
    /// record wins. When every source comes up empty the caller gets
    /// [`ConfigError::NotConfigured`] with remediation text.
    pub fn get_config(&self) -> ConfigResult<DatabricksConfig> {
        if let Some(source) = &self.override_source {
            return match source.attempt()? {
                Some(config) => Ok(config),
                None => Err(ConfigError::override_returned_nothing(source.name())),
            };
        }

        let task_context = self.task_context_source();
        let environment = EnvironmentSource::new();
        let profile = ProfileSource::with_store(self.store.clone(), DEFAULT_SECTION);

        // 1. task context, 2. environment, 3. DEFAULT profile
        let chain: [&dyn CredentialSource; 3] = [&task_context, &environment, &profile];
        for source in chain {
            if let Some(config) = source.attempt()? {
                if config.is_valid() {
                    debug!("using credentials from {}", source.name());
                    return Ok(config);
                }
            }
        }

        Err(ConfigError::not_configured(None))
    }

    /// Resolve credentials for one profile, never failing
    ///
    /// Environment variables shadow even a named profile, so a job can
    /// redirect every profile-addressed lookup at once. A missing or
    /// unusable profile, and even an unreadable store, produce an empty
    /// record; callers check validity themselves on this path.
    pub fn get_config_for_profile(&self, profile: Option<&str>) -> DatabricksConfig {
        let profile = profile.unwrap_or(DEFAULT_SECTION);

        if let Ok(Some(config)) = EnvironmentSource::new().attempt() {
            debug!("environment variables shadow profile `{profile}`");
            return config;
        }

        let source = ProfileSource::with_store(self.store.clone(), profile);
        match source.attempt() {
            Ok(Some(config)) => config,
            Ok(None) => DatabricksConfig::empty(),
            Err(err) => {
                warn!("could not read profile `{profile}`: {err}");
                DatabricksConfig::empty()
            }
        }
    }

    /// Write a credential record to a profile and persist the store
    ///
    /// All recognized keys are written; fields that are `None` or empty
    /// remove their keys from the section so stale values never linger.
    /// The named section is created when absent.
    pub fn update_and_persist(
        &self,
        profile: Option<&str>,
        config: &DatabricksConfig,
    ) -> ConfigResult<()> {
        let profile = profile.unwrap_or(DEFAULT_SECTION);
        let mut profiles = self.store.load()?;

        profiles.ensure_section(profile);
        profiles.set(profile, HOST_KEY, config.host.as_deref());
        profiles.set(profile, USERNAME_KEY, config.username.as_deref());
        profiles.set(profile, PASSWORD_KEY, config.password.as_deref());
        profiles.set(profile, TOKEN_KEY, config.token.as_deref());
        profiles.set(profile, REFRESH_TOKEN_KEY, config.refresh_token.as_deref());
        profiles.set(profile, INSECURE_KEY, config.insecure.as_deref());
        profiles.set(
            profile,
            JOBS_API_VERSION_KEY,
            config.jobs_api_version.as_deref(),
        );

        self.store.save(&profiles)
    }

    fn task_context_source(&self) -> TaskContextSource {
        match &self.task_context {
            Some(context) => TaskContextSource::new(context.clone()),
            None => TaskContextSource::detached(),
        }
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}
