//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the query engine and the
//! collaborators that own records and preferences. Implementations live in
//! the storage crate.

use crate::Sighting;

/// Source of the sighting collection
///
/// Implemented by the infrastructure layer (spotter-store)
pub trait SightingSource {
    /// Error type for source operations
    type Error;

    /// Record a new sighting
    fn add_sighting(&mut self, sighting: Sighting) -> Result<(), Self::Error>;

    /// All sightings, most recently captured first
    fn list_sightings(&self) -> Result<Vec<Sighting>, Self::Error>;

    /// Number of stored sightings
    fn count(&self) -> Result<usize, Self::Error>;
}

/// A value held in the preference store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceValue {
    /// String preference
    Text(String),
    /// Integer preference
    Integer(i64),
}

/// String-keyed key-value store for user preferences
///
/// Optional preferences are modelled by presence: writing `None` removes the
/// key. Implemented by the infrastructure layer (spotter-store)
pub trait PreferenceStore {
    /// Error type for store operations
    type Error;

    /// Read a preference, `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<PreferenceValue>, Self::Error>;

    /// Write a preference, or remove it when `value` is `None`
    fn set(&mut self, key: &str, value: Option<PreferenceValue>) -> Result<(), Self::Error>;

    /// Apply several writes as one unit
    ///
    /// Either every entry lands or, on error, none of them do.
    fn set_all(
        &mut self,
        entries: &[(String, Option<PreferenceValue>)],
    ) -> Result<(), Self::Error>;
}
