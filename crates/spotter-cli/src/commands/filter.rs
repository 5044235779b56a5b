//! Filter command implementation.

use crate::cli::{FilterAction, FilterArgs};
use crate::commands::parse_facet;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use spotter_domain::{FacetValue, PreferenceStore};
use spotter_engine::{FilterPreferences, FilterState};
use std::fmt::Display;

/// Apply a filter action to `state`, returning a confirmation message.
///
/// Returns `None` for read-only actions.
pub fn apply_action(action: FilterAction, state: &mut FilterState) -> Result<Option<String>> {
    let message = match action {
        FilterAction::Show => return Ok(None),
        FilterAction::Set { facet, value } => {
            let facet = parse_facet(&facet)?;
            let value = FacetValue::parse_for(facet, &value).map_err(CliError::InvalidInput)?;
            let message = format!("Filter set: {}={}", facet, value);
            state.select(facet, value)?;
            message
        }
        FilterAction::Unset { facet } => {
            let facet = parse_facet(&facet)?;
            match state.unselect(facet) {
                Some(old) => format!("Filter removed: {}={}", facet, old),
                None => format!("No filter on {}", facet),
            }
        }
        FilterAction::Search { text } => {
            let message = if text.is_empty() {
                "Search cleared".to_string()
            } else {
                format!("Search set: {}", text)
            };
            state.set_search_text(text);
            message
        }
        FilterAction::Clear => {
            state.clear_all();
            "All filters cleared".to_string()
        }
    };
    Ok(Some(message))
}

/// Execute a filter management command.
pub fn execute_filter<S>(
    args: FilterArgs,
    prefs: &mut FilterPreferences<S>,
    formatter: &Formatter,
) -> Result<()>
where
    S: PreferenceStore,
    S::Error: Display,
{
    let mut state = prefs.load();

    match apply_action(args.action, &mut state)? {
        None => println!("{}", formatter.format_filter(&state)?),
        Some(message) => {
            if prefs.save(&state) {
                println!("{}", formatter.success(&message));
            } else {
                println!("{}", formatter.warning(&format!("{} (not saved)", message)));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotter_domain::Facet;

    fn set(facet: &str, value: &str) -> FilterAction {
        FilterAction::Set {
            facet: facet.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_set_and_unset() {
        let mut state = FilterState::new();
        let msg = apply_action(set("year", "2026"), &mut state).unwrap();
        assert_eq!(msg.as_deref(), Some("Filter set: year=2026"));
        assert_eq!(state.selection(Facet::Year), Some(&FacetValue::Integer(2026)));

        let msg = apply_action(
            FilterAction::Unset {
                facet: "YEAR".to_string(),
            },
            &mut state,
        )
        .unwrap();
        assert_eq!(msg.as_deref(), Some("Filter removed: year=2026"));
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_set_rejects_bad_value() {
        let mut state = FilterState::new();
        assert!(apply_action(set("month", "March"), &mut state).is_err());
        assert!(apply_action(set("airline", "NZ"), &mut state).is_err());
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_search_and_clear() {
        let mut state = FilterState::new();
        apply_action(
            FilterAction::Search {
                text: "787".to_string(),
            },
            &mut state,
        )
        .unwrap();
        apply_action(set("city", "Denver"), &mut state).unwrap();
        assert_eq!(state.search_text(), "787");

        let msg = apply_action(FilterAction::Clear, &mut state).unwrap();
        assert_eq!(msg.as_deref(), Some("All filters cleared"));
        assert_eq!(state, FilterState::new());
    }

    #[test]
    fn test_show_is_read_only() {
        let mut state = FilterState::new().with_search_text("a350");
        assert_eq!(apply_action(FilterAction::Show, &mut state).unwrap(), None);
        assert_eq!(state.search_text(), "a350");
    }
}
