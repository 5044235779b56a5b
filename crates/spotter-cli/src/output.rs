//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use spotter_domain::{Facet, FacetValue, Sighting};
use spotter_engine::{FilterState, PeriodGroup};
use std::collections::{BTreeMap, BTreeSet};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Output format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format sightings grouped by period.
    pub fn format_groups(&self, groups: &[PeriodGroup<'_>]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_groups_json(groups),
            OutputFormat::Table => Ok(self.format_groups_table(groups)),
            OutputFormat::Quiet => Ok(groups
                .iter()
                .flat_map(|g| g.sightings.iter().map(|s| s.id.to_string()))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_groups_json(&self, groups: &[PeriodGroup<'_>]) -> Result<String> {
        let json_groups: Vec<serde_json::Value> = groups
            .iter()
            .map(|g| {
                serde_json::json!({
                    "period": g.key.to_string(),
                    "label": g.label,
                    "sightings": g.sightings,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_groups)?)
    }

    fn format_groups_table(&self, groups: &[PeriodGroup<'_>]) -> String {
        if groups.is_empty() {
            return self.colorize("No sightings found.", "yellow");
        }

        let mut sections = Vec::with_capacity(groups.len());
        for group in groups {
            let heading = format!("{} ({})", group.label, group.sightings.len());
            sections.push(format!(
                "{}\n{}",
                self.colorize(&heading, "cyan"),
                sightings_table(&group.sightings)
            ));
        }
        sections.join("\n\n")
    }

    /// Format the values still available per facet, marking current selections.
    pub fn format_facets(
        &self,
        options: &BTreeMap<Facet, BTreeSet<FacetValue>>,
        state: &FilterState,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: BTreeMap<&str, &BTreeSet<FacetValue>> =
                    options.iter().map(|(f, v)| (f.as_str(), v)).collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(options
                .iter()
                .flat_map(|(facet, values)| {
                    values.iter().map(move |v| format!("{}={}", facet, v))
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Facet", "Available"]);
                for (facet, values) in options {
                    let selected = state.selection(*facet);
                    let listed: Vec<String> = values
                        .iter()
                        .map(|v| {
                            if Some(v) == selected {
                                format!("[{}]", v)
                            } else {
                                v.to_string()
                            }
                        })
                        .collect();
                    builder.push_record([facet.label().to_string(), listed.join(", ")]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format the current filter state.
    pub fn format_filter(&self, state: &FilterState) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(state)?),
            OutputFormat::Quiet => {
                let mut lines: Vec<String> = state
                    .selections()
                    .map(|(facet, value)| format!("{}={}", facet, value))
                    .collect();
                if !state.search_text().is_empty() {
                    lines.insert(0, format!("search={}", state.search_text()));
                }
                Ok(lines.join("\n"))
            }
            OutputFormat::Table => {
                if !state.has_active_filters() {
                    return Ok(self.info("No active filters."));
                }
                let mut builder = Builder::default();
                builder.push_record(["Facet", "Value"]);
                if !state.search_text().is_empty() {
                    builder.push_record(["Search".to_string(), state.search_text().to_string()]);
                }
                for (facet, value) in state.selections() {
                    builder.push_record([facet.label().to_string(), value.to_string()]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn sightings_table(sightings: &[&Sighting]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "ID",
        "Captured",
        "Manufacturer",
        "Model",
        "ICAO",
        "Registration",
        "Location",
    ]);

    for s in sightings {
        let location: Vec<&str> = [&s.city, &s.state, &s.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();
        let id = s.id.to_string();
        builder.push_record([
            id[..8].to_string(), // Truncate ID for readability
            s.captured_at.format("%Y-%m-%d %H:%M").to_string(),
            s.manufacturer.clone(),
            s.model.clone(),
            s.icao.clone(),
            s.registration.clone().unwrap_or_default(),
            location.join(", "),
        ]);
    }

    styled(builder)
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
