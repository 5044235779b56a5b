//! List command implementation.

use crate::cli::ListArgs;
use crate::commands::parse_selection;
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use spotter_domain::{PreferenceStore, SightingSource};
use spotter_engine::query::group_by_period;
use spotter_engine::{FilterPreferences, FilterState, QueryEngine, QueryResult};
use std::fmt::Display;

/// Work out the state for this run: the saved filter (unless `--all`)
/// with the one-off overrides applied on top. Nothing is persisted.
pub fn resolve_state<S>(args: &ListArgs, prefs: &FilterPreferences<S>) -> Result<FilterState>
where
    S: PreferenceStore,
    S::Error: Display,
{
    let mut state = if args.all {
        FilterState::new()
    } else {
        prefs.load()
    };

    if let Some(search) = &args.search {
        state.set_search_text(search.clone());
    }
    for raw in &args.selections {
        let (facet, value) = parse_selection(raw)?;
        state.select(facet, value)?;
    }
    Ok(state)
}

/// Execute the list command.
pub fn execute_list<S>(
    args: ListArgs,
    prefs: &FilterPreferences<S>,
    engine: &QueryEngine,
    formatter: &Formatter,
) -> Result<()>
where
    S: PreferenceStore + SightingSource,
    <S as PreferenceStore>::Error: Display,
    CliError: From<<S as SightingSource>::Error>,
{
    let state = resolve_state(&args, prefs)?;
    let records = prefs.store().list_sightings()?;
    let result = engine.run(&records, &state);

    let mut matched = result.sightings(&records);
    if let Some(limit) = args.limit {
        matched.truncate(limit);
    }
    let groups = group_by_period(matched);

    println!("{}", formatter.format_groups(&groups)?);

    if formatter.format() == OutputFormat::Table {
        if state.has_active_filters() {
            println!(
                "{}",
                formatter.info(&format!(
                    "{} of {} sightings match the current filter",
                    result.len(),
                    records.len()
                ))
            );
        }
        for line in stale_selections(&state, &result) {
            eprintln!("{}", formatter.warning(&line));
        }
    }

    Ok(())
}

/// Selections that match nothing when combined with the other active filters.
///
/// A saved value stays in effect until the user clears it, even when the
/// sighting it came from is gone.
pub fn stale_selections(state: &FilterState, result: &QueryResult) -> Vec<String> {
    state
        .selections()
        .filter(|(facet, value)| {
            result
                .options_for(*facet)
                .is_none_or(|options| !options.contains(*value))
        })
        .map(|(facet, value)| {
            format!(
                "Selection {}={} matches nothing with the other active filters \
                 (run `spotter filter unset {}`)",
                facet, value, facet
            )
        })
        .collect()
}
