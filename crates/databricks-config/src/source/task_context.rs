//! Task context credential source
//!
//! Hosted Databricks runtimes hand each worker a per-task property map that
//! carries an API endpoint and an ephemeral token. The library never links
//! against a runtime; embedders implement [`TaskContext`] over whatever
//! handle their environment provides and install it on the resolver. Outside
//! such an environment the source simply yields nothing.

use std::sync::Arc;

use tracing::debug;

use crate::error::ConfigResult;
use crate::record::DatabricksConfig;

use super::CredentialSource;

/// Local property naming the workspace API endpoint
pub const API_URL_PROPERTY: &str = "spark.databricks.api.url";

/// Local property carrying the ephemeral API token
pub const TOKEN_PROPERTY: &str = "spark.databricks.token";

/// Local property flagging that TLS verification should be skipped
pub const IGNORE_TLS_PROPERTY: &str = "spark.databricks.ignoreTls";

/// Access to the hosting runtime's per-task property map
pub trait TaskContext: Send + Sync {
    /// Read a local property, `None` when unset
    fn local_property(&self, key: &str) -> Option<String>;

    /// Set a local property, or clear it when `value` is `None`
    fn set_local_property(&self, key: &str, value: Option<&str>);
}

/// Credentials taken from the hosting runtime's task context
#[derive(Clone)]
pub struct TaskContextSource {
    context: Option<Arc<dyn TaskContext>>,
}

impl TaskContextSource {
    /// Create a source backed by a live task context handle
    pub fn new(context: Arc<dyn TaskContext>) -> Self {
        Self {
            context: Some(context),
        }
    }

    /// Create a source for use outside a hosting runtime
    ///
    /// A detached source yields nothing and ignores [`set_insecure`]
    /// requests, so callers never need to branch on where they run.
    ///
    /// [`set_insecure`]: TaskContextSource::set_insecure
    pub fn detached() -> Self {
        Self { context: None }
    }

    /// Record or clear the TLS-skip flag on the task context
    ///
    /// Writes the literal `"True"` when enabled and removes the property
    /// when disabled, matching what the runtime itself stores there.
    pub fn set_insecure(&self, insecure: bool) {
        if let Some(context) = &self.context {
            let value = if insecure { Some("True") } else { None };
            context.set_local_property(IGNORE_TLS_PROPERTY, value);
        }
    }
}

impl CredentialSource for TaskContextSource {
    fn name(&self) -> String {
        "task context".to_string()
    }

    fn attempt(&self) -> ConfigResult<Option<DatabricksConfig>> {
        let Some(context) = &self.context else {
            return Ok(None);
        };

        let config = DatabricksConfig::from_token(
            context.local_property(API_URL_PROPERTY),
            context.local_property(TOKEN_PROPERTY),
            None,
            context.local_property(IGNORE_TLS_PROPERTY),
            None,
        );

        if config.is_valid() {
            debug!("resolved credentials from task context");
            Ok(Some(config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeTaskContext;

    #[test]
    fn test_reads_endpoint_and_token() {
        let context = FakeTaskContext::with(&[
            (API_URL_PROPERTY, "https://worker.example.com"),
            (TOKEN_PROPERTY, "ephemeral-token"),
            (IGNORE_TLS_PROPERTY, "True"),
        ]);

        let source = TaskContextSource::new(context);
        let config = source.attempt().unwrap().unwrap();
        assert!(config.is_valid_with_token());
        assert_eq!(config.host.as_deref(), Some("https://worker.example.com"));
        assert_eq!(config.token.as_deref(), Some("ephemeral-token"));
        assert_eq!(config.insecure.as_deref(), Some("True"));
    }

    #[test]
    fn test_token_without_endpoint_yields_nothing() {
        let context = FakeTaskContext::with(&[(TOKEN_PROPERTY, "ephemeral-token")]);

        let source = TaskContextSource::new(context);
        assert!(source.attempt().unwrap().is_none());
    }

    #[test]
    fn test_detached_source_yields_nothing() {
        let source = TaskContextSource::detached();
        assert!(source.attempt().unwrap().is_none());
    }

    #[test]
    fn test_set_insecure_writes_and_clears_property() {
        let context = FakeTaskContext::with(&[]);
        let source = TaskContextSource::new(context.clone());

        source.set_insecure(true);
        assert_eq!(
            context.local_property(IGNORE_TLS_PROPERTY).as_deref(),
            Some("True")
        );

        source.set_insecure(false);
        assert!(context.local_property(IGNORE_TLS_PROPERTY).is_none());
    }

    #[test]
    fn test_set_insecure_is_a_no_op_when_detached() {
        // Nothing to assert beyond not panicking
        TaskContextSource::detached().set_insecure(true);
    }
}
