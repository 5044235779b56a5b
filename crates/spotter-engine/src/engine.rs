//! Query engine entry point
//!
//! Runs one complete query (matches plus option lists for every facet) over a
//! snapshot, choosing between the linear scan and the index by collection
//! size.

use crate::index::FacetIndex;
use crate::query::{self, PeriodGroup};
use crate::{EngineConfig, FilterState};
use spotter_domain::{Facet, FacetValue, Sighting};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::debug;

/// Outcome of one query
///
/// Matches are stored as positions into the slice the query ran over, so a
/// result can outlive a borrow of that slice. Resolve them with
/// [`sightings`](Self::sightings) or [`groups`](Self::groups).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Positions of matching sightings, in input order
    pub matched: Vec<usize>,

    /// Values still reachable per facet with that facet relaxed
    pub options: BTreeMap<Facet, BTreeSet<FacetValue>>,
}

impl QueryResult {
    /// Number of matching sightings
    pub fn len(&self) -> usize {
        self.matched.len()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    /// Matching sightings from the slice the query ran over
    pub fn sightings<'a>(&self, records: &'a [Sighting]) -> Vec<&'a Sighting> {
        self.matched.iter().filter_map(|pos| records.get(*pos)).collect()
    }

    /// Matching sightings grouped by period, most recent first
    pub fn groups<'a>(&self, records: &'a [Sighting]) -> Vec<PeriodGroup<'a>> {
        query::group_by_period(self.sightings(records))
    }

    /// Options offered for `facet`
    pub fn options_for(&self, facet: Facet) -> Option<&BTreeSet<FacetValue>> {
        self.options.get(&facet)
    }
}

/// Stateless query runner
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use spotter_domain::{Facet, FacetValue, Sighting};
/// use spotter_engine::{EngineConfig, FilterState, QueryEngine};
///
/// let at = Utc.with_ymd_and_hms(2026, 1, 14, 9, 30, 0).unwrap();
/// let records = vec![
///     Sighting::new("Boeing", "787", "B789", at),
///     Sighting::new("Airbus", "A350", "A359", at),
/// ];
/// let engine = QueryEngine::new(EngineConfig::default());
/// let state = FilterState::new().with_search_text("a350");
///
/// let result = engine.run(&records, &state);
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.groups(&records)[0].label, "January 2026");
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    config: EngineConfig,
}

impl QueryEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a full query over `records`
    ///
    /// Builds a throwaway index when the collection reaches the configured
    /// threshold. Callers that query the same snapshot repeatedly should keep
    /// an index and use [`run_indexed`](Self::run_indexed).
    pub fn run(&self, records: &[Sighting], state: &FilterState) -> QueryResult {
        if self.config.use_index_for(records.len()) {
            let index = FacetIndex::build(records);
            return self.run_indexed(&index, state);
        }

        let start = Instant::now();
        let result = QueryResult {
            matched: query::filter_positions(records, state),
            options: query::available_values(records, state),
        };
        debug!(
            "Scanned {} sightings: {} matched in {:?}",
            records.len(),
            result.len(),
            start.elapsed()
        );
        result
    }

    /// Run a full query through a prebuilt index
    pub fn run_indexed(&self, index: &FacetIndex, state: &FilterState) -> QueryResult {
        let start = Instant::now();
        let result = QueryResult {
            matched: index.filter(state),
            options: index.available_values(state),
        };
        debug!(
            "Index query over {} sightings: {} matched in {:?}",
            index.len(),
            result.len(),
            start.elapsed()
        );
        result
    }
}
