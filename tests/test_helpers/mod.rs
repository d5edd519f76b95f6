//! Scoped environment overrides for configuration tests.

use std::env;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Prefix shared by every configuration variable.
pub const PREFIX: &str = "SWITCHBOARD__";

/// Holds the environment lock and restores overridden variables on drop.
///
/// Every `SWITCHBOARD__*` variable already present is cleared for the guard
/// lifetime so tests only see the overrides they declare.
pub struct EnvVarGuard {
    previous: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Clears inherited configuration and applies `overrides`.
    pub fn with_config(overrides: &[(&str, &str)]) -> Self {
        let lock = env_lock();
        let mut previous: Vec<(String, Option<String>)> = env::vars()
            .filter(|(key, _)| key.starts_with(PREFIX))
            .map(|(key, value)| (key, Some(value)))
            .collect();
        for (key, _) in &previous {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                env::remove_var(key);
            }
        }

        for (key, value) in overrides {
            if !previous.iter().any(|(existing, _)| existing == key) {
                previous.push(((*key).to_owned(), None));
            }
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                env::set_var(key, value);
            }
        }

        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(original) => env::set_var(&key, original),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}
