//! Databricks credential resolution library
//!
//! This crate decides which Databricks credentials a process should use,
//! resolving them from the hosting runtime's task context, `DATABRICKS_*`
//! environment variables, and the `~/.databrickscfg` profile file, and it
//! manages that profile file on behalf of configuration tooling.

pub mod error;
pub mod record;
pub mod resolver;
pub mod source;
pub mod store;

#[cfg(test)]
pub mod test_support;

// Re-export commonly used types
pub use error::{ConfigError, ConfigResult};
pub use record::DatabricksConfig;
pub use resolver::ConfigResolver;
pub use source::{
    CredentialSource, EnvironmentSource, ProfileSource, TaskContext, TaskContextSource,
};
pub use store::{
    locate_store_path, ProfileStore, RawProfiles, CONFIG_FILE_ENV_VAR, DEFAULT_SECTION,
};
