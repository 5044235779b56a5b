//! Spotter Domain Layer
//!
//! This crate contains the core domain model for Spotter, a personal log of
//! captured aircraft sightings. It defines the record type, the facets a
//! collection can be narrowed by, and the trait interfaces that the storage
//! layer implements.
//!
//! ## Key Concepts
//!
//! - **Sighting**: One captured aircraft, with every filterable attribute
//! - **Facet**: A single-select filter dimension (year, manufacturer, city...)
//! - **Facet Value**: The value a sighting carries for a facet, if any
//! - **Period**: The (year, month) bucket sightings are grouped under for display
//!
//! ## Architecture
//!
//! - Pure data and accessor functions only
//! - No storage, rendering or network I/O
//! - Trait definitions for the external record store and preference store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod facet;
pub mod period;
pub mod sighting;
pub mod traits;

// Re-exports for convenience
pub use facet::{search_corpus, Facet, FacetKind, FacetValue};
pub use period::{month_name, period_label, PeriodKey};
pub use sighting::{Sighting, SightingId};
pub use traits::{PreferenceStore, PreferenceValue, SightingSource};
