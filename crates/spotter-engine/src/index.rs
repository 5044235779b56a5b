//! Inverted index over a sighting snapshot
//!
//! Produces exactly the same answers as the linear-scan functions in
//! [`crate::query`], which the tests use as an oracle. Worth it only for
//! collections well beyond a few thousand sightings.

use crate::query::Matcher;
use crate::FilterState;
use spotter_domain::{search_corpus, Facet, FacetValue, Sighting};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Per-facet posting lists plus precomputed search corpora
///
/// Positions refer to the slice the index was built from; rebuild it
/// whenever that slice changes.
#[derive(Debug, Clone, Default)]
pub struct FacetIndex {
    len: usize,
    corpora: Vec<String>,
    columns: BTreeMap<Facet, Vec<Option<FacetValue>>>,
    postings: BTreeMap<Facet, HashMap<FacetValue, Vec<usize>>>,
}

impl FacetIndex {
    /// Build an index over `records`
    pub fn build(records: &[Sighting]) -> Self {
        let corpora = records.iter().map(search_corpus).collect();
        let mut columns = BTreeMap::new();
        let mut postings = BTreeMap::new();

        for facet in Facet::ALL {
            let column: Vec<Option<FacetValue>> =
                records.iter().map(|s| facet.value_of(s)).collect();

            let mut lists: HashMap<FacetValue, Vec<usize>> = HashMap::new();
            for (pos, value) in column.iter().enumerate() {
                if let Some(value) = value {
                    lists.entry(value.clone()).or_default().push(pos);
                }
            }

            columns.insert(facet, column);
            postings.insert(facet, lists);
        }

        Self {
            len: records.len(),
            corpora,
            columns,
            postings,
        }
    }

    /// Number of indexed sightings
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Positions of the sightings satisfying `state`, ascending
    pub fn filter(&self, state: &FilterState) -> Vec<usize> {
        self.candidates(&Matcher::new(state, None))
    }

    /// Distinct values of `facet` with that facet's own constraint relaxed
    pub fn available_values_for(&self, facet: Facet, state: &FilterState) -> BTreeSet<FacetValue> {
        let Some(column) = self.columns.get(&facet) else {
            return BTreeSet::new();
        };
        self.candidates(&Matcher::new(state, Some(facet)))
            .into_iter()
            .filter_map(|pos| column[pos].clone())
            .collect()
    }

    /// Available values for every facet
    pub fn available_values(&self, state: &FilterState) -> BTreeMap<Facet, BTreeSet<FacetValue>> {
        Facet::ALL
            .into_iter()
            .map(|facet| (facet, self.available_values_for(facet, state)))
            .collect()
    }

    fn candidates(&self, matcher: &Matcher<'_>) -> Vec<usize> {
        let mut lists: Vec<&[usize]> = Vec::with_capacity(matcher.selections().len());
        for (facet, value) in matcher.selections() {
            match self.postings.get(facet).and_then(|by_value| by_value.get(*value)) {
                Some(list) => lists.push(list.as_slice()),
                None => return Vec::new(),
            }
        }

        // Intersect shortest first
        lists.sort_by_key(|list| list.len());
        let mut positions: Vec<usize> = match lists.split_first() {
            Some((first, rest)) => rest
                .iter()
                .fold(first.to_vec(), |acc, list| intersect(&acc, list)),
            None => (0..self.len).collect(),
        };

        if let Some(needle) = matcher.needle() {
            positions.retain(|pos| self.corpora[*pos].contains(needle));
        }
        positions
    }
}

/// Intersection of two ascending position lists
fn intersect(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
