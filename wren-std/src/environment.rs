//! Process-wide configuration store.
//!
//! [`Environment`] is an explicit key/value store that components receive by
//! injection instead of reading `std::env` ambiently. Clones share the same
//! underlying map, so a value set through one handle is visible through all.

use crate::config::ConfigError;
use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

/// A shared, thread-safe set of configuration values.
#[derive(Clone, Default)]
pub struct Environment {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl Environment {
    /// An empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the process environment.
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    /// The process-wide environment, initialised from the process on first use.
    pub fn shared() -> &'static Environment {
        static SHARED: OnceLock<Environment> = OnceLock::new();
        SHARED.get_or_init(Environment::from_process)
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// The value stored under `key`, parsed as `T`.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue {
                    key: key.to_owned(),
                    value,
                }),
        }
    }

    /// Returns `true` if `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into())
    }

    /// Remove `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Environment").field("len", &len).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let env = Environment::new();
        assert_eq!(env.set("TEST_ENV", "testing"), None);
        assert_eq!(env.get("TEST_ENV").as_deref(), Some("testing"));
        assert_eq!(env.remove("TEST_ENV").as_deref(), Some("testing"));
        assert_eq!(env.get("TEST_ENV"), None);
    }

    #[test]
    fn test_clones_share_values() {
        let env = Environment::new();
        let other = env.clone();
        env.set("SHARED", "1");
        assert!(other.contains("SHARED"));
    }

    #[test]
    fn test_get_parsed() {
        let env: Environment = [("PORT", " 8080 "), ("BAD", "eighty")].into_iter().collect();
        assert_eq!(env.get_parsed::<u16>("PORT").unwrap(), Some(8080));
        assert_eq!(env.get_parsed::<u16>("MISSING").unwrap(), None);
        let err = env.get_parsed::<u16>("BAD").unwrap_err();
        assert!(err.to_string().contains("BAD"));
    }

    #[test]
    fn test_shared_is_a_singleton() {
        let first = Environment::shared();
        first.set("WREN_SHARED_SINGLETON_TEST", "yes");
        assert_eq!(
            Environment::shared()
                .get("WREN_SHARED_SINGLETON_TEST")
                .as_deref(),
            Some("yes")
        );
        first.remove("WREN_SHARED_SINGLETON_TEST");
    }
}
