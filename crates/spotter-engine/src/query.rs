//! Linear-scan query engine
//!
//! Every operation here is a pure function of the sighting slice and the
//! filter state. Available values are computed with one full scan per facet,
//! each scan relaxing only that facet's own constraint.

use crate::FilterState;
use spotter_domain::{search_corpus, Facet, FacetValue, PeriodKey, Sighting};
use std::collections::{BTreeMap, BTreeSet};

/// Compiled form of a filter state, optionally with one facet relaxed
pub(crate) struct Matcher<'s> {
    needle: Option<String>,
    selections: Vec<(Facet, &'s FacetValue)>,
}

impl<'s> Matcher<'s> {
    pub(crate) fn new(state: &'s FilterState, relaxed: Option<Facet>) -> Self {
        let needle = match state.search_text() {
            "" => None,
            text => Some(text.to_lowercase()),
        };
        let selections = state
            .selections()
            .filter(|(facet, _)| Some(*facet) != relaxed)
            .collect();
        Self { needle, selections }
    }

    pub(crate) fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    pub(crate) fn selections(&self) -> &[(Facet, &'s FacetValue)] {
        &self.selections
    }

    pub(crate) fn matches(&self, sighting: &Sighting) -> bool {
        let selected = self
            .selections
            .iter()
            .all(|(facet, value)| facet.value_of(sighting).as_ref() == Some(*value));

        selected
            && self
                .needle
                .as_ref()
                .is_none_or(|needle| search_corpus(sighting).contains(needle.as_str()))
    }
}

/// Whether `sighting` satisfies every active constraint in `state`
///
/// `relaxed` names a facet whose constraint is ignored.
pub fn matches(sighting: &Sighting, state: &FilterState, relaxed: Option<Facet>) -> bool {
    Matcher::new(state, relaxed).matches(sighting)
}

/// Sightings satisfying `state`, in input order
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use spotter_domain::{Facet, FacetValue, Sighting};
/// use spotter_engine::{query, FilterState};
///
/// let at = Utc.with_ymd_and_hms(2026, 1, 14, 9, 30, 0).unwrap();
/// let records = vec![
///     Sighting::new("Boeing", "787", "B789", at),
///     Sighting::new("Airbus", "A350", "A359", at),
/// ];
/// let state = FilterState::new()
///     .with_selection(Facet::Manufacturer, FacetValue::text("Boeing"))
///     .unwrap();
///
/// let found = query::filter(&records, &state);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].model, "787");
/// ```
pub fn filter<'a>(records: &'a [Sighting], state: &FilterState) -> Vec<&'a Sighting> {
    let matcher = Matcher::new(state, None);
    records.iter().filter(|s| matcher.matches(s)).collect()
}

/// Positions in `records` of the sightings satisfying `state`, ascending
pub fn filter_positions(records: &[Sighting], state: &FilterState) -> Vec<usize> {
    let matcher = Matcher::new(state, None);
    records
        .iter()
        .enumerate()
        .filter(|(_, s)| matcher.matches(s))
        .map(|(pos, _)| pos)
        .collect()
}

/// Distinct values of `facet` across the sightings that satisfy every other
/// active constraint (search text included)
///
/// The facet's own selection is relaxed, so a selected value stays on offer
/// as long as some sighting matching the rest of the state carries it.
pub fn available_values_for(
    facet: Facet,
    records: &[Sighting],
    state: &FilterState,
) -> BTreeSet<FacetValue> {
    let matcher = Matcher::new(state, Some(facet));
    records
        .iter()
        .filter(|s| matcher.matches(s))
        .filter_map(|s| facet.value_of(s))
        .collect()
}

/// Available values for every facet, one independent scan each
pub fn available_values(
    records: &[Sighting],
    state: &FilterState,
) -> BTreeMap<Facet, BTreeSet<FacetValue>> {
    Facet::ALL
        .into_iter()
        .map(|facet| (facet, available_values_for(facet, records, state)))
        .collect()
}

/// Sightings sharing one (year, month) period
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodGroup<'a> {
    /// Grouping key
    pub key: PeriodKey,
    /// Display label, e.g. "January 2026"
    pub label: String,
    /// Members, in the order they were supplied
    pub sightings: Vec<&'a Sighting>,
}

/// Group sightings by (year, month), most recent period first
///
/// Within a group the input order is preserved.
pub fn group_by_period<'a, I>(records: I) -> Vec<PeriodGroup<'a>>
where
    I: IntoIterator<Item = &'a Sighting>,
{
    let mut buckets: BTreeMap<PeriodKey, Vec<&'a Sighting>> = BTreeMap::new();
    for sighting in records {
        buckets
            .entry(PeriodKey::new(sighting.year, sighting.month))
            .or_default()
            .push(sighting);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(key, sightings)| PeriodGroup {
            key,
            label: key.label(),
            sightings,
        })
        .collect()
}
