//! Facets command implementation.

use crate::cli::FacetsArgs;
use crate::commands::parse_facet;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use spotter_domain::{PreferenceStore, SightingSource};
use spotter_engine::{FilterPreferences, QueryEngine};
use std::fmt::Display;

/// Execute the facets command.
///
/// Each facet lists the values that would still produce results if picked,
/// given every other saved constraint.
pub fn execute_facets<S>(
    args: FacetsArgs,
    prefs: &FilterPreferences<S>,
    engine: &QueryEngine,
    formatter: &Formatter,
) -> Result<()>
where
    S: PreferenceStore + SightingSource,
    <S as PreferenceStore>::Error: Display,
    CliError: From<<S as SightingSource>::Error>,
{
    let only = args.facet.as_deref().map(parse_facet).transpose()?;

    let state = prefs.load();
    let records = prefs.store().list_sightings()?;
    let mut options = engine.run(&records, &state).options;

    if let Some(facet) = only {
        options.retain(|f, _| *f == facet);
    }

    println!("{}", formatter.format_facets(&options, &state)?);
    Ok(())
}
