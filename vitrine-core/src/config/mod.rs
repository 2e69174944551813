//! Property-style configuration consumed by the pipeline.
//!
//! Every value is looked up when it is needed, so toggling a key takes
//! effect on the next scan or scheduler tick.

mod loader;

pub use loader::{CONFIG_JSON_ENV, CONFIG_PATH_ENV};

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::warn;

/// Read access to string keyed configuration properties.
pub trait ConfigService: Send + Sync {
    /// Raw value for `key`, if set.
    fn get_property(&self, key: &str) -> Option<String>;

    fn get_string(&self, key: &str, default: &str) -> String {
        self.get_property(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        let Some(raw) = self.get_property(key) else {
            return default;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => true,
            "false" | "no" | "off" | "0" => false,
            other => {
                warn!(key, value = other, "ignoring non-boolean property value");
                default
            }
        }
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        let Some(raw) = self.get_property(key) else {
            return default;
        };
        match raw.trim().parse::<i64>() {
            Ok(value) => value,
            Err(err) => {
                warn!(key, value = %raw, error = %err, "ignoring non-numeric property value");
                default
            }
        }
    }
}

/// In-memory property store, mutable at runtime.
#[derive(Debug, Default)]
pub struct PropertyConfig {
    properties: RwLock<HashMap<String, String>>,
}

impl PropertyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let properties = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            properties: RwLock::new(properties),
        }
    }

    pub fn set_property(&self, key: impl Into<String>, value: impl ToString) {
        self.properties.write().insert(key.into(), value.to_string());
    }

    pub fn remove_property(&self, key: &str) -> Option<String> {
        self.properties.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.properties.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.read().is_empty()
    }
}

impl ConfigService for PropertyConfig {
    fn get_property(&self, key: &str) -> Option<String> {
        self.properties.read().get(key).cloned()
    }
}
