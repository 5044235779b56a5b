//! Command implementations.

pub mod add;
pub mod facets;
pub mod filter;
pub mod list;

pub use self::add::execute_add;
pub use self::facets::execute_facets;
pub use self::filter::execute_filter;
pub use self::list::execute_list;

use crate::error::{CliError, Result};
use spotter_domain::{Facet, FacetValue};

/// Parse a facet name given on the command line.
pub fn parse_facet(name: &str) -> Result<Facet> {
    Facet::parse(name).ok_or_else(|| {
        let known: Vec<&str> = Facet::ALL.iter().map(Facet::as_str).collect();
        CliError::InvalidInput(format!(
            "Unknown facet '{}' (expected one of: {})",
            name,
            known.join(", ")
        ))
    })
}

/// Parse a `facet=value` selection.
pub fn parse_selection(input: &str) -> Result<(Facet, FacetValue)> {
    let (name, raw) = input.split_once('=').ok_or_else(|| {
        CliError::InvalidInput(format!("Expected facet=value, got '{}'", input))
    })?;
    let facet = parse_facet(name.trim())?;
    let value = FacetValue::parse_for(facet, raw).map_err(CliError::InvalidInput)?;
    Ok((facet, value))
}
