//! In-memory preference store

use spotter_domain::{PreferenceStore, PreferenceValue};
use std::collections::HashMap;
use std::convert::Infallible;

/// HashMap-backed [`PreferenceStore`] for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, PreferenceValue>,
}

impl MemoryPreferenceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<PreferenceValue>, Self::Error> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Option<PreferenceValue>) -> Result<(), Self::Error> {
        match value {
            Some(value) => {
                self.values.insert(key.to_string(), value);
            }
            None => {
                self.values.remove(key);
            }
        }
        Ok(())
    }

    fn set_all(
        &mut self,
        entries: &[(String, Option<PreferenceValue>)],
    ) -> Result<(), Self::Error> {
        for (key, value) in entries {
            self.set(key, value.clone())?;
        }
        Ok(())
    }
}
