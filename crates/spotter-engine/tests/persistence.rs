//! Filter persistence against the real stores

use chrono::{TimeZone, Utc};
use spotter_domain::{Facet, FacetValue, PreferenceStore, Sighting, SightingSource};
use spotter_engine::{EngineConfig, FilterPreferences, FilterState, QueryEngine};
use spotter_store::{MemoryPreferenceStore, SqliteStore};

fn boeing_search() -> FilterState {
    FilterState::new()
        .with_search_text("78")
        .with_selection(Facet::Manufacturer, FacetValue::text("Boeing"))
        .unwrap()
        .with_selection(Facet::Classification, FacetValue::Integer(1))
        .unwrap()
}

#[test]
fn test_sqlite_roundtrip_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spotter.db");
    let config = EngineConfig::default();

    {
        let mut prefs = FilterPreferences::new(SqliteStore::new(&path).unwrap(), &config);
        assert!(prefs.save(&boeing_search()));
    }

    let prefs = FilterPreferences::new(SqliteStore::new(&path).unwrap(), &config);
    assert_eq!(prefs.load(), boeing_search());
}

#[test]
fn test_clear_all_removes_persisted_facets() {
    let config = EngineConfig::default();
    let mut prefs = FilterPreferences::new(SqliteStore::new(":memory:").unwrap(), &config);
    let mut state = boeing_search();
    prefs.save(&state);

    assert!(prefs.clear_all(&mut state));
    assert!(prefs.store().get("filter.manufacturer").unwrap().is_none());
    assert_eq!(prefs.load(), FilterState::new());
}

#[test]
fn test_memory_store_roundtrip() {
    let mut prefs = FilterPreferences::new(MemoryPreferenceStore::new(), &EngineConfig::default());
    prefs.save(&boeing_search());
    assert_eq!(prefs.load(), boeing_search());
    // search text plus two facets
    assert_eq!(prefs.into_inner().len(), 3);
}

#[test]
fn test_stale_selection_filters_to_empty_until_cleared() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let at = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
    store.add_sighting(Sighting::new("Boeing", "787", "B789", at)).unwrap();

    let config = EngineConfig::default();
    let mut prefs = FilterPreferences::new(store, &config);
    let stale = FilterState::new()
        .with_selection(Facet::Manufacturer, FacetValue::text("Fokker"))
        .unwrap();
    prefs.save(&stale);

    let mut state = prefs.load();
    assert_eq!(state, stale);

    let records = prefs.store().list_sightings().unwrap();
    let engine = QueryEngine::new(config);
    assert!(engine.run(&records, &state).is_empty());

    prefs.clear_all(&mut state);
    assert_eq!(engine.run(&records, &state).len(), 1);
}
