//! Configuration for query execution and filter persistence

use crate::EngineError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the query engine
///
/// # Examples
///
/// ```
/// use spotter_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.search_debounce_ms, 250);
/// assert_eq!(config.key_prefix, "filter");
///
/// // No debounce, for scripted use and tests
/// let config = EngineConfig::immediate();
/// assert_eq!(config.search_debounce_ms, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Quiet period the worker waits for before running a query (in milliseconds)
    /// Default: 250
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Namespace prefix for persisted filter keys
    /// Default: "filter"
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Extra attempts after a failed filter save before the write is dropped
    /// Default: 1
    #[serde(default = "default_save_retries")]
    pub save_retries: u32,

    /// Collection size at which the indexed engine replaces the linear scan
    /// Default: none (always scan)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_threshold: Option<usize>,
}

fn default_search_debounce_ms() -> u64 {
    250
}

fn default_key_prefix() -> String {
    "filter".to_string()
}

fn default_save_retries() -> u32 {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
            key_prefix: default_key_prefix(),
            save_retries: default_save_retries(),
            index_threshold: None,
        }
    }
}

impl EngineConfig {
    /// Configuration for large interactive collections
    ///
    /// - Debounce: 300ms
    /// - Indexed engine from 5000 sightings
    pub fn interactive() -> Self {
        Self {
            search_debounce_ms: 300,
            index_threshold: Some(5000),
            ..Self::default()
        }
    }

    /// No debounce, no retries
    pub fn immediate() -> Self {
        Self {
            search_debounce_ms: 0,
            save_retries: 0,
            ..Self::default()
        }
    }

    /// Get the debounce window as Duration
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Whether a collection of `len` sightings should be queried through the index
    pub fn use_index_for(&self, len: usize) -> bool {
        self.index_threshold.is_some_and(|threshold| len >= threshold)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// Returns an error if the key prefix is empty or contains whitespace
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.key_prefix.is_empty() {
            return Err(EngineError::Config("key_prefix cannot be empty".to_string()));
        }
        if self.key_prefix.chars().any(char::is_whitespace) {
            return Err(EngineError::Config(format!(
                "key_prefix cannot contain whitespace: '{}'",
                self.key_prefix
            )));
        }
        Ok(())
    }
}
