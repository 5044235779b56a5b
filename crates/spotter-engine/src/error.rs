//! Error types for engine operations
//!
//! Queries themselves are total and never fail; these cover the edges around
//! them: user input into the filter state, configuration, and the worker.

use spotter_domain::Facet;
use thiserror::Error;

/// Errors that can occur around query execution
#[derive(Error, Debug)]
pub enum EngineError {
    /// A value of the wrong kind was selected for a facet
    #[error("Invalid value for facet {facet}: {reason}")]
    InvalidValue {
        /// Facet the value was meant for
        facet: Facet,
        /// What was wrong with it
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (task stopped or channel closed)
    #[error("Worker error: {0}")]
    Worker(String),
}
