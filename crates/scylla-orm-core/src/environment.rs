// Rust guideline compliant 2026-02-07

//! Process-wide application environment (`dev`, `staging`, `prod`, ...).
//!
//! The environment selects which `[environments.<name>]` block of the
//! configuration applies, e.g. the keyspace replication settings.

use std::sync::RwLock;
use tracing::warn;

/// Environment variable read by [`ApplicationEnvironment::init_from_env`].
pub const ENV_VAR: &str = "APPLICATION_ENV";

/// Environment used when none has been set.
pub const DEFAULT_ENVIRONMENT: &str = "dev";

static ENVIRONMENT: RwLock<Option<String>> = RwLock::new(None);

/// Handle on the process-wide application environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationEnvironment;

impl ApplicationEnvironment {
    /// Sets the environment for the rest of the process.
    pub fn set_environment(env: impl Into<String>) {
        let mut guard = ENVIRONMENT.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(env.into());
    }

    /// Returns the current environment, or `dev` with a warning if it was never set.
    pub fn get_environment() -> String {
        let guard = ENVIRONMENT.read().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(env) => env.clone(),
            None => {
                warn!(
                    env = DEFAULT_ENVIRONMENT,
                    "Using the default environment as the application env has not been set"
                );
                DEFAULT_ENVIRONMENT.to_string()
            }
        }
    }

    /// Returns true if an environment has been set.
    pub fn is_set() -> bool {
        ENVIRONMENT
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Sets the environment from `APPLICATION_ENV` when it is present and non-empty.
    ///
    /// Returns the value that was applied.
    pub fn init_from_env() -> Option<String> {
        let env = std::env::var(ENV_VAR).ok().filter(|v| !v.trim().is_empty())?;
        Self::set_environment(env.trim());
        Some(env.trim().to_string())
    }

    /// Forgets the environment, restoring the unset state.
    pub fn clear() {
        let mut guard = ENVIRONMENT.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}
