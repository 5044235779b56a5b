//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Spotter CLI - Browse and narrow your aircraft sighting log.
#[derive(Debug, Parser)]
#[command(name = "spotter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Sighting database path
    #[arg(short, long, global = true, env = "SPOTTER_DB")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new sighting
    Add(AddArgs),

    /// List sightings matching the saved filter, grouped by month
    List(ListArgs),

    /// Show the values still available for each facet
    Facets(FacetsArgs),

    /// Inspect or change the saved filter
    Filter(FilterArgs),
}

/// Arguments for the add command.
#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Manufacturer (e.g., Boeing)
    pub manufacturer: String,

    /// Model (e.g., 787-9)
    pub model: String,

    /// ICAO type designator (e.g., B789)
    pub icao: String,

    /// IATA airline code
    #[arg(long)]
    pub iata: Option<String>,

    /// Registration mark
    #[arg(short, long)]
    pub registration: Option<String>,

    /// Classification code
    #[arg(long)]
    pub classification: Option<u8>,

    /// Aircraft type code
    #[arg(short = 't', long = "type")]
    pub aircraft_type: Option<String>,

    /// Country
    #[arg(long)]
    pub country: Option<String>,

    /// State or region
    #[arg(long)]
    pub state: Option<String>,

    /// City
    #[arg(long)]
    pub city: Option<String>,

    /// Capture time (RFC 3339, defaults to now)
    #[arg(long)]
    pub captured_at: Option<String>,

    /// Photo reference
    #[arg(long)]
    pub photo: Option<String>,

    /// Rating (0-5)
    #[arg(long)]
    pub rating: Option<u8>,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Free-text search for this run only
    #[arg(short, long)]
    pub search: Option<String>,

    /// Extra facet selection for this run only (format: facet=value)
    #[arg(short = 'w', long = "where")]
    pub selections: Vec<String>,

    /// Ignore the saved filter
    #[arg(long)]
    pub all: bool,

    /// Maximum number of sightings to show
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the facets command.
#[derive(Debug, Parser)]
pub struct FacetsArgs {
    /// Only show this facet
    pub facet: Option<String>,
}

/// Arguments for filter management.
#[derive(Debug, Parser)]
pub struct FilterArgs {
    #[command(subcommand)]
    pub action: FilterAction,
}

/// Filter management actions.
#[derive(Debug, Subcommand)]
pub enum FilterAction {
    /// Show the saved filter
    Show,

    /// Select a value for a facet
    Set {
        /// Facet name (year, month, manufacturer, iata, icao, classification, type, ...)
        facet: String,
        /// Value to select
        value: String,
    },

    /// Remove the selection for a facet
    Unset {
        /// Facet name
        facet: String,
    },

    /// Set the free-text search (empty to clear)
    Search {
        /// Search text
        #[arg(default_value = "")]
        text: String,
    },

    /// Clear every facet and the search text
    Clear,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
