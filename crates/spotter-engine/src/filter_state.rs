//! Filter state and its persistence
//!
//! [`FilterState`] is a plain value: mutating it never touches storage.
//! [`FilterPreferences`] writes it to a [`PreferenceStore`] when the caller
//! asks, one key per facet under a namespace prefix.

use crate::{EngineConfig, EngineError};
use serde::{Deserialize, Serialize};
use spotter_domain::{Facet, FacetKind, FacetValue, PreferenceStore, PreferenceValue};
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::{debug, warn};

/// Current facet selections plus free-text query
///
/// Each facet holds at most one value. A facet with no entry is
/// unconstrained.
///
/// # Examples
///
/// ```
/// use spotter_domain::{Facet, FacetValue};
/// use spotter_engine::FilterState;
///
/// let mut state = FilterState::new();
/// assert!(!state.has_active_filters());
///
/// state.select(Facet::Manufacturer, FacetValue::text("Boeing")).unwrap();
/// assert!(state.has_active_filters());
///
/// state.clear_all();
/// assert!(!state.has_active_filters());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    search_text: String,

    #[serde(default)]
    selections: BTreeMap<Facet, FacetValue>,
}

impl FilterState {
    /// Create an empty state (no constraints)
    pub fn new() -> Self {
        Self::default()
    }

    /// Current free-text query
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Replace the free-text query
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Builder form of [`set_search_text`](Self::set_search_text)
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.set_search_text(text);
        self
    }

    /// Value currently selected for `facet`
    pub fn selection(&self, facet: Facet) -> Option<&FacetValue> {
        self.selections.get(&facet)
    }

    /// Select `value` for `facet`, replacing any previous selection
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidValue`] if the value kind does not match
    /// the facet (e.g. text for `year`).
    pub fn select(&mut self, facet: Facet, value: FacetValue) -> Result<(), EngineError> {
        if value.kind() != facet.kind() {
            return Err(EngineError::InvalidValue {
                facet,
                reason: format!("expected {:?}, got {:?}", facet.kind(), value.kind()),
            });
        }
        self.selections.insert(facet, value);
        Ok(())
    }

    /// Builder form of [`select`](Self::select)
    pub fn with_selection(mut self, facet: Facet, value: FacetValue) -> Result<Self, EngineError> {
        self.select(facet, value)?;
        Ok(self)
    }

    /// Remove the selection for `facet`, returning it
    pub fn unselect(&mut self, facet: Facet) -> Option<FacetValue> {
        self.selections.remove(&facet)
    }

    /// Copy of this state with the constraint on `facet` removed
    pub fn without(&self, facet: Facet) -> Self {
        let mut relaxed = self.clone();
        relaxed.unselect(facet);
        relaxed
    }

    /// Active selections, in facet order
    pub fn selections(&self) -> impl Iterator<Item = (Facet, &FacetValue)> {
        self.selections.iter().map(|(facet, value)| (*facet, value))
    }

    /// Facets that currently hold a value
    pub fn active_facets(&self) -> Vec<Facet> {
        self.selections.keys().copied().collect()
    }

    /// True iff the search text is non-empty or any facet holds a value
    pub fn has_active_filters(&self) -> bool {
        !self.search_text.is_empty() || !self.selections.is_empty()
    }

    /// Reset every facet and the search text
    pub fn clear_all(&mut self) {
        self.search_text.clear();
        self.selections.clear();
    }
}

const SEARCH_TEXT_KEY: &str = "search_text";

/// Explicit persistence for [`FilterState`]
///
/// Filter preferences are a convenience, so store failures never escape:
/// unreadable keys load as "no constraint" and failed writes are retried
/// and then dropped, with a warning logged either way.
pub struct FilterPreferences<S> {
    store: S,
    prefix: String,
    save_retries: u32,
}

impl<S> FilterPreferences<S>
where
    S: PreferenceStore,
    S::Error: Display,
{
    /// Wrap a preference store using the prefix and retry policy from `config`
    pub fn new(store: S, config: &EngineConfig) -> Self {
        Self {
            store,
            prefix: config.key_prefix.clone(),
            save_retries: config.save_retries,
        }
    }

    /// Persisted key for a field name, e.g. `filter.manufacturer`
    pub fn key(&self, name: &str) -> String {
        format!("{}.{}", self.prefix, name)
    }

    /// Load the last saved state
    ///
    /// Absent keys default to no constraint. Stored values are not checked
    /// against any collection: a stale selection is kept verbatim.
    pub fn load(&self) -> FilterState {
        let mut state = FilterState::new();

        match self.store.get(&self.key(SEARCH_TEXT_KEY)) {
            Ok(Some(PreferenceValue::Text(text))) => state.search_text = text,
            Ok(Some(other)) => debug!("Ignoring non-text search preference: {:?}", other),
            Ok(None) => {}
            Err(e) => warn!("Failed to read search text preference: {}", e),
        }

        for facet in Facet::ALL {
            let key = self.key(facet.as_str());
            match self.store.get(&key) {
                Ok(Some(stored)) => match facet_value_from(facet, stored) {
                    Some(value) => {
                        state.selections.insert(facet, value);
                    }
                    None => debug!("Ignoring preference {} with mismatched kind", key),
                },
                Ok(None) => {}
                Err(e) => warn!("Failed to read preference {}: {}", key, e),
            }
        }

        state
    }

    /// Persist `state`, returning whether the write landed
    pub fn save(&mut self, state: &FilterState) -> bool {
        for attempt in 0..=self.save_retries {
            match self.write(state) {
                Ok(()) => return true,
                Err(e) => warn!(
                    "Failed to save filter preferences (attempt {}/{}): {}",
                    attempt + 1,
                    self.save_retries + 1,
                    e
                ),
            }
        }
        warn!("Dropping filter preference write");
        false
    }

    /// Reset `state` and persist the empty state
    pub fn clear_all(&mut self, state: &mut FilterState) -> bool {
        state.clear_all();
        self.save(state)
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap into the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }

    fn write(&mut self, state: &FilterState) -> Result<(), S::Error> {
        let mut entries = Vec::with_capacity(Facet::ALL.len() + 1);
        entries.push((
            self.key(SEARCH_TEXT_KEY),
            Some(PreferenceValue::Text(state.search_text.clone())),
        ));

        for facet in Facet::ALL {
            let value = state.selection(facet).map(|value| match value {
                FacetValue::Integer(n) => PreferenceValue::Integer(*n),
                FacetValue::Text(s) => PreferenceValue::Text(s.clone()),
            });
            entries.push((self.key(facet.as_str()), value));
        }

        // One batch, so a failed save leaves the previous state intact
        self.store.set_all(&entries)
    }
}

fn facet_value_from(facet: Facet, stored: PreferenceValue) -> Option<FacetValue> {
    match (facet.kind(), stored) {
        (FacetKind::Integer, PreferenceValue::Integer(n)) => Some(FacetValue::Integer(n)),
        (FacetKind::Text, PreferenceValue::Text(s)) if !s.is_empty() => Some(FacetValue::Text(s)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockStore {
        values: HashMap<String, PreferenceValue>,
        failing_writes: u32,
        rejected_key: Option<String>,
        fail_reads: bool,
        writes: u32,
    }

    impl PreferenceStore for MockStore {
        type Error = String;

        fn get(&self, key: &str) -> Result<Option<PreferenceValue>, Self::Error> {
            if self.fail_reads {
                return Err("disk unavailable".to_string());
            }
            Ok(self.values.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: Option<PreferenceValue>) -> Result<(), Self::Error> {
            match value {
                Some(v) => self.values.insert(key.to_string(), v),
                None => self.values.remove(key),
            };
            Ok(())
        }

        fn set_all(
            &mut self,
            entries: &[(String, Option<PreferenceValue>)],
        ) -> Result<(), Self::Error> {
            self.writes += 1;
            if self.failing_writes > 0 {
                self.failing_writes -= 1;
                return Err("write rejected".to_string());
            }
            let mut staged = self.values.clone();
            for (key, value) in entries {
                if self.rejected_key.as_deref() == Some(key.as_str()) {
                    return Err(format!("write to {} rejected", key));
                }
                match value {
                    Some(v) => staged.insert(key.clone(), v.clone()),
                    None => staged.remove(key),
                };
            }
            self.values = staged;
            Ok(())
        }
    }

    fn boeing_2026() -> FilterState {
        FilterState::new()
            .with_search_text("787")
            .with_selection(Facet::Manufacturer, FacetValue::text("Boeing"))
            .unwrap()
            .with_selection(Facet::Year, FacetValue::Integer(2026))
            .unwrap()
    }

    #[test]
    fn test_has_active_filters() {
        assert!(!FilterState::new().has_active_filters());
        assert!(FilterState::new().with_search_text("a").has_active_filters());
        assert!(FilterState::new()
            .with_selection(Facet::City, FacetValue::text("Denver"))
            .unwrap()
            .has_active_filters());
    }

    #[test]
    fn test_select_replaces_previous_value() {
        let mut state = FilterState::new();
        state.select(Facet::Manufacturer, FacetValue::text("Boeing")).unwrap();
        state.select(Facet::Manufacturer, FacetValue::text("Airbus")).unwrap();
        assert_eq!(state.selection(Facet::Manufacturer), Some(&FacetValue::text("Airbus")));
        assert_eq!(state.active_facets(), vec![Facet::Manufacturer]);
    }

    #[test]
    fn test_select_rejects_wrong_kind() {
        let mut state = FilterState::new();
        let err = state.select(Facet::Year, FacetValue::text("2026")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidValue { facet: Facet::Year, .. }));
        assert!(state.select(Facet::City, FacetValue::Integer(3)).is_err());
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_without_relaxes_one_facet() {
        let state = boeing_2026();
        let relaxed = state.without(Facet::Manufacturer);
        assert!(relaxed.selection(Facet::Manufacturer).is_none());
        assert_eq!(relaxed.selection(Facet::Year), Some(&FacetValue::Integer(2026)));
        assert_eq!(relaxed.search_text(), "787");
        // Original untouched
        assert!(state.selection(Facet::Manufacturer).is_some());
    }

    #[test]
    fn test_clear_all() {
        let mut state = boeing_2026();
        state.clear_all();
        assert_eq!(state, FilterState::new());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let config = EngineConfig::default();
        let mut prefs = FilterPreferences::new(MockStore::default(), &config);
        let state = boeing_2026();

        assert!(prefs.save(&state));
        assert_eq!(prefs.load(), state);

        let stored = &prefs.store().values;
        assert_eq!(
            stored.get("filter.manufacturer"),
            Some(&PreferenceValue::Text("Boeing".to_string()))
        );
        assert_eq!(stored.get("filter.year"), Some(&PreferenceValue::Integer(2026)));
        assert!(!stored.contains_key("filter.city"));
    }

    #[test]
    fn test_save_removes_cleared_facets() {
        let config = EngineConfig::default();
        let mut prefs = FilterPreferences::new(MockStore::default(), &config);
        let mut state = boeing_2026();
        prefs.save(&state);

        state.unselect(Facet::Year);
        prefs.save(&state);

        assert!(!prefs.store().values.contains_key("filter.year"));
        assert_eq!(prefs.load().selection(Facet::Year), None);
    }

    #[test]
    fn test_clear_all_persists_empty_state() {
        let config = EngineConfig::default();
        let mut prefs = FilterPreferences::new(MockStore::default(), &config);
        let mut state = boeing_2026();
        prefs.save(&state);

        assert!(prefs.clear_all(&mut state));
        assert!(!state.has_active_filters());
        assert!(!prefs.load().has_active_filters());
    }

    #[test]
    fn test_load_from_empty_store_defaults() {
        let prefs = FilterPreferences::new(MockStore::default(), &EngineConfig::default());
        assert_eq!(prefs.load(), FilterState::new());
    }

    #[test]
    fn test_load_keeps_stale_values_verbatim() {
        let mut store = MockStore::default();
        store.values.insert(
            "filter.manufacturer".to_string(),
            PreferenceValue::Text("Fokker".to_string()),
        );
        let prefs = FilterPreferences::new(store, &EngineConfig::default());
        assert_eq!(
            prefs.load().selection(Facet::Manufacturer),
            Some(&FacetValue::text("Fokker"))
        );
    }

    #[test]
    fn test_load_ignores_mismatched_kinds() {
        let mut store = MockStore::default();
        store.values.insert("filter.year".to_string(), PreferenceValue::Text("soon".to_string()));
        store.values.insert("filter.city".to_string(), PreferenceValue::Integer(7));
        store.values.insert("filter.search_text".to_string(), PreferenceValue::Integer(1));
        let prefs = FilterPreferences::new(store, &EngineConfig::default());
        assert_eq!(prefs.load(), FilterState::new());
    }

    #[test]
    fn test_load_failure_uses_defaults() {
        let store = MockStore {
            fail_reads: true,
            ..Default::default()
        };
        let prefs = FilterPreferences::new(store, &EngineConfig::default());
        assert_eq!(prefs.load(), FilterState::new());
    }

    #[test]
    fn test_save_retries_then_succeeds() {
        let store = MockStore {
            failing_writes: 1,
            ..Default::default()
        };
        let mut prefs = FilterPreferences::new(store, &EngineConfig::default());
        assert!(prefs.save(&boeing_2026()));
        assert_eq!(prefs.load(), boeing_2026());
    }

    #[test]
    fn test_save_drops_after_retries_exhausted() {
        let store = MockStore {
            failing_writes: u32::MAX,
            ..Default::default()
        };
        let mut prefs = FilterPreferences::new(store, &EngineConfig::default());
        assert!(!prefs.save(&boeing_2026()));
        // One initial attempt plus one retry
        assert_eq!(prefs.store().writes, 2);
    }

    #[test]
    fn test_failed_save_keeps_previous_state() {
        let config = EngineConfig::default();
        let mut prefs = FilterPreferences::new(MockStore::default(), &config);
        let old = FilterState::new()
            .with_selection(Facet::Year, FacetValue::Integer(2026))
            .unwrap()
            .with_selection(Facet::Manufacturer, FacetValue::text("Boeing"))
            .unwrap();
        assert!(prefs.save(&old));

        prefs.store.rejected_key = Some("filter.manufacturer".to_string());
        let new = FilterState::new()
            .with_selection(Facet::Year, FacetValue::Integer(2025))
            .unwrap()
            .with_selection(Facet::Manufacturer, FacetValue::text("Airbus"))
            .unwrap();

        assert!(!prefs.save(&new));
        assert_eq!(prefs.load(), old);
    }

    #[test]
    fn test_custom_prefix() {
        let config = EngineConfig {
            key_prefix: "gallery".to_string(),
            ..Default::default()
        };
        let mut prefs = FilterPreferences::new(MockStore::default(), &config);
        prefs.save(&boeing_2026());
        assert!(prefs.store().values.contains_key("gallery.manufacturer"));
        assert_eq!(prefs.key("city"), "gallery.city");
    }

    #[test]
    fn test_state_json_shape() {
        let json = serde_json::to_value(boeing_2026()).unwrap();
        assert_eq!(json["search_text"], "787");
        assert_eq!(json["selections"]["manufacturer"], "Boeing");
        assert_eq!(json["selections"]["year"], 2026);

        let back: FilterState = serde_json::from_value(json).unwrap();
        assert_eq!(back, boeing_2026());
    }
}
