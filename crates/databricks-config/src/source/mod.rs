//! Credential sources
//!
//! Every way the library can obtain credentials is expressed as a
//! [`CredentialSource`]. The resolver consults sources in a fixed order and
//! takes the first valid credential set; embedders can install a source of
//! their own to preempt that chain entirely.

pub mod environment;
pub mod profile;
pub mod task_context;

use crate::error::ConfigResult;
use crate::record::DatabricksConfig;

pub use environment::EnvironmentSource;
pub use profile::ProfileSource;
pub use task_context::{TaskContext, TaskContextSource};

/// A single origin of Databricks credentials
pub trait CredentialSource: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> String;

    /// Try to produce a credential record
    ///
    /// `Ok(None)` means this source has nothing to offer and the next one
    /// should be consulted. `Ok(Some(_))` from the built-in sources always
    /// carries a valid record; an installed override may return anything.
    /// Errors abort resolution rather than falling through, so a corrupt
    /// profile file is reported instead of silently skipped.
    fn attempt(&self) -> ConfigResult<Option<DatabricksConfig>>;
}
