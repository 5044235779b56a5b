//! Add command implementation.

use crate::cli::AddArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::{DateTime, Utc};
use spotter_domain::{Sighting, SightingSource};
use tracing::info;

/// Build a sighting from command arguments.
pub fn build_sighting(args: AddArgs) -> Result<Sighting> {
    let captured_at = match args.captured_at.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| CliError::InvalidInput(format!("Invalid capture time '{}': {}", raw, e)))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    if let Some(rating) = args.rating {
        if rating > 5 {
            return Err(CliError::InvalidInput(
                "Rating must be between 0 and 5".to_string(),
            ));
        }
    }

    let mut sighting = Sighting::new(args.manufacturer, args.model, args.icao, captured_at);
    sighting.iata = args.iata;
    sighting.registration = args.registration;
    sighting.classification = args.classification;
    sighting.aircraft_type = args.aircraft_type;
    sighting.country = args.country;
    sighting.state = args.state;
    sighting.city = args.city;
    sighting.photo = args.photo;
    sighting.rating = args.rating;
    Ok(sighting)
}

/// Execute the add command.
pub fn execute_add<S>(args: AddArgs, store: &mut S, formatter: &Formatter) -> Result<()>
where
    S: SightingSource,
    crate::error::CliError: From<S::Error>,
{
    let sighting = build_sighting(args)?;
    let id = sighting.id;
    store.add_sighting(sighting)?;
    info!("Recorded sighting {}", id);

    println!("{}", formatter.success(&format!("Sighting recorded: {}", id)));
    Ok(())
}
