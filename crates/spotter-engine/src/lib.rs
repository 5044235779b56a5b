//! Spotter Query Engine
//!
//! Faceted, bi-directional search over a collection of aircraft sightings.
//!
//! # Overview
//!
//! Given a snapshot of sightings and a [`FilterState`], the engine computes:
//! - **Matches**: sightings satisfying every active facet and the free-text query
//! - **Options**: for each facet, the values still reachable if that facet alone
//!   were relaxed, so a picker never offers a dead end
//! - **Groups**: matches bucketed by (year, month), most recent first
//!
//! All queries are pure functions of their inputs. The engine never touches
//! storage; [`FilterPreferences`] persists the filter state on request.
//!
//! # Usage
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use spotter_domain::{Facet, FacetValue, Sighting};
//! use spotter_engine::{query, FilterState};
//!
//! let at = Utc.with_ymd_and_hms(2026, 1, 14, 9, 30, 0).unwrap();
//! let records = vec![
//!     Sighting::new("Boeing", "787", "B789", at),
//!     Sighting::new("Airbus", "A350", "A359", at),
//! ];
//!
//! let state = FilterState::new()
//!     .with_selection(Facet::Manufacturer, FacetValue::text("Boeing"))
//!     .unwrap();
//!
//! assert_eq!(query::filter(&records, &state).len(), 1);
//! assert_eq!(query::available_values_for(Facet::Manufacturer, &records, &state).len(), 2);
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [engine]
//! search_debounce_ms = 250
//! key_prefix = "filter"
//! save_retries = 1
//! index_threshold = 5000
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod filter_state;
pub mod index;
pub mod query;
mod worker;

pub use config::EngineConfig;
pub use engine::{QueryEngine, QueryResult};
pub use error::EngineError;
pub use filter_state::{FilterPreferences, FilterState};
pub use index::FacetIndex;
pub use query::PeriodGroup;
pub use worker::{QuerySnapshot, QueryWorker};
