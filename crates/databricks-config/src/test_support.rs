//! Shared helpers for tests that touch process-global state

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::source::TaskContext;

/// Serializes tests that read or mutate environment variables.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Take the environment lock, recovering it if a previous holder panicked.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// RAII guard for temporarily setting/removing an environment variable in tests.
///
/// IMPORTANT: This does not prevent other tests from mutating the environment.
/// Pair usage with `env_lock()` since credential variables are process-global.
pub struct ScopedEnvVar {
    key: String,
    old: Option<OsString>,
}

impl ScopedEnvVar {
    pub fn set(key: &str, value: impl AsRef<OsStr>) -> Self {
        let old = std::env::var_os(key);
        unsafe { std::env::set_var(key, value) };
        Self {
            key: key.to_string(),
            old,
        }
    }

    pub fn remove(key: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe { std::env::remove_var(key) };
        Self {
            key: key.to_string(),
            old,
        }
    }
}

impl Drop for ScopedEnvVar {
    fn drop(&mut self) {
        match &self.old {
            Some(value) => unsafe { std::env::set_var(&self.key, value) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}

/// In-memory stand-in for a hosting runtime's task context.
#[derive(Default)]
pub struct FakeTaskContext {
    properties: Mutex<HashMap<String, String>>,
}

impl FakeTaskContext {
    pub fn with(entries: &[(&str, &str)]) -> Arc<Self> {
        let context = Self::default();
        {
            let mut properties = context.properties.lock().unwrap();
            for (key, value) in entries {
                properties.insert(key.to_string(), value.to_string());
            }
        }
        Arc::new(context)
    }
}

impl TaskContext for FakeTaskContext {
    fn local_property(&self, key: &str) -> Option<String> {
        self.properties.lock().unwrap().get(key).cloned()
    }

    fn set_local_property(&self, key: &str, value: Option<&str>) {
        let mut properties = self.properties.lock().unwrap();
        match value {
            Some(value) => {
                properties.insert(key.to_string(), value.to_string());
            }
            None => {
                properties.remove(key);
            }
        }
    }
}

/// Clear every variable the library reads, restoring them on drop.
pub fn scrub_env() -> Vec<ScopedEnvVar> {
    [
        crate::store::CONFIG_FILE_ENV_VAR,
        crate::source::environment::HOST_ENV_VAR,
        crate::source::environment::USERNAME_ENV_VAR,
        crate::source::environment::PASSWORD_ENV_VAR,
        crate::source::environment::TOKEN_ENV_VAR,
        crate::source::environment::REFRESH_TOKEN_ENV_VAR,
        crate::source::environment::INSECURE_ENV_VAR,
        crate::source::environment::JOBS_API_VERSION_ENV_VAR,
    ]
    .into_iter()
    .map(ScopedEnvVar::remove)
    .collect()
}
