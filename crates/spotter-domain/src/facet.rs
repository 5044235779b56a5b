//! Facet module - filter dimensions and the values sightings carry for them
//!
//! Every facet is single-select: a filter either pins it to one exact value
//! or leaves it unconstrained. The accessors here are pure and total; an
//! absent or empty attribute simply has no facet value.

use crate::sighting::Sighting;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single-select filter dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    /// Capture year
    Year,
    /// Capture month (1-12)
    Month,
    /// Aircraft manufacturer
    Manufacturer,
    /// IATA airline code
    Iata,
    /// ICAO type designator
    Icao,
    /// Aircraft classification code
    Classification,
    /// Aircraft type code
    #[serde(rename = "type")]
    AircraftType,
    /// Capture country
    Country,
    /// Capture state or region
    State,
    /// Capture city
    City,
}

/// The kind of value a facet holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// Whole numbers (year, month, classification)
    Integer,
    /// Free-form text
    Text,
}

impl Facet {
    /// Every facet, in display order
    pub const ALL: [Facet; 10] = [
        Facet::Year,
        Facet::Month,
        Facet::Manufacturer,
        Facet::Iata,
        Facet::Icao,
        Facet::Classification,
        Facet::AircraftType,
        Facet::Country,
        Facet::State,
        Facet::City,
    ];

    /// Stable machine name, used for persistence keys and CLI arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Year => "year",
            Facet::Month => "month",
            Facet::Manufacturer => "manufacturer",
            Facet::Iata => "iata",
            Facet::Icao => "icao",
            Facet::Classification => "classification",
            Facet::AircraftType => "type",
            Facet::Country => "country",
            Facet::State => "state",
            Facet::City => "city",
        }
    }

    /// Human readable name for picker headers
    pub fn label(&self) -> &'static str {
        match self {
            Facet::Year => "Year",
            Facet::Month => "Month",
            Facet::Manufacturer => "Manufacturer",
            Facet::Iata => "Airline",
            Facet::Icao => "ICAO Type",
            Facet::Classification => "Classification",
            Facet::AircraftType => "Aircraft Type",
            Facet::Country => "Country",
            Facet::State => "State",
            Facet::City => "City",
        }
    }

    /// Parse a facet from its machine name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.to_lowercase();
        Self::ALL.into_iter().find(|facet| facet.as_str() == lowered)
    }

    /// The kind of value this facet holds
    pub fn kind(&self) -> FacetKind {
        match self {
            Facet::Year | Facet::Month | Facet::Classification => FacetKind::Integer,
            _ => FacetKind::Text,
        }
    }

    /// Extract this facet's value from a sighting
    ///
    /// Absent and empty attributes both yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use spotter_domain::{Facet, FacetValue, Sighting};
    ///
    /// let at = Utc.with_ymd_and_hms(2026, 1, 14, 9, 30, 0).unwrap();
    /// let sighting = Sighting::new("Boeing", "787-9", "B789", at);
    ///
    /// assert_eq!(Facet::Manufacturer.value_of(&sighting), Some(FacetValue::text("Boeing")));
    /// assert_eq!(Facet::Year.value_of(&sighting), Some(FacetValue::Integer(2026)));
    /// assert_eq!(Facet::City.value_of(&sighting), None);
    /// ```
    pub fn value_of(&self, sighting: &Sighting) -> Option<FacetValue> {
        match self {
            Facet::Year => Some(FacetValue::Integer(i64::from(sighting.year))),
            Facet::Month => Some(FacetValue::Integer(i64::from(sighting.month))),
            Facet::Manufacturer => text_value(Some(&sighting.manufacturer)),
            Facet::Iata => text_value(sighting.iata.as_deref()),
            Facet::Icao => text_value(Some(&sighting.icao)),
            Facet::Classification => sighting
                .classification
                .map(|c| FacetValue::Integer(i64::from(c))),
            Facet::AircraftType => text_value(sighting.aircraft_type.as_deref()),
            Facet::Country => text_value(sighting.country.as_deref()),
            Facet::State => text_value(sighting.state.as_deref()),
            Facet::City => text_value(sighting.city.as_deref()),
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Facet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid facet: {}", s))
    }
}

fn text_value(value: Option<&str>) -> Option<FacetValue> {
    match value {
        Some(s) if !s.is_empty() => Some(FacetValue::Text(s.to_string())),
        _ => None,
    }
}

/// The value a sighting carries for a facet
///
/// Integers order before text, which only matters for mixed sets and never
/// happens for a single facet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetValue {
    /// Numeric facet value
    Integer(i64),
    /// Text facet value, compared exactly (case-sensitive)
    Text(String),
}

impl FacetValue {
    /// Convenience constructor for text values
    pub fn text(value: impl Into<String>) -> Self {
        FacetValue::Text(value.into())
    }

    /// The kind of this value
    pub fn kind(&self) -> FacetKind {
        match self {
            FacetValue::Integer(_) => FacetKind::Integer,
            FacetValue::Text(_) => FacetKind::Text,
        }
    }

    /// Parse user input into a value suitable for `facet`
    ///
    /// # Errors
    /// Returns an error if the input is empty, or not a whole number for an
    /// integer facet.
    pub fn parse_for(facet: Facet, input: &str) -> Result<Self, String> {
        if input.is_empty() {
            return Err(format!("Empty value for facet {}", facet));
        }
        match facet.kind() {
            FacetKind::Integer => input
                .trim()
                .parse::<i64>()
                .map(FacetValue::Integer)
                .map_err(|_| format!("Facet {} expects a whole number, got '{}'", facet, input)),
            FacetKind::Text => Ok(FacetValue::Text(input.to_string())),
        }
    }
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Integer(n) => write!(f, "{}", n),
            FacetValue::Text(s) => f.write_str(s),
        }
    }
}

/// Lower-cased corpus the free-text search runs against
///
/// Joins manufacturer, model, icao, registration, city, state and country
/// with single spaces. Absent fields contribute nothing; present but empty
/// fields still take their slot.
pub fn search_corpus(sighting: &Sighting) -> String {
    let parts = [
        Some(sighting.manufacturer.as_str()),
        Some(sighting.model.as_str()),
        Some(sighting.icao.as_str()),
        sighting.registration.as_deref(),
        sighting.city.as_deref(),
        sighting.state.as_deref(),
        sighting.country.as_deref(),
    ];

    parts
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> Sighting {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        Sighting::new("Boeing", "787-9", "B789", at)
            .with_iata("NZ")
            .with_registration("ZK-NZE")
            .with_classification(1)
            .with_location("New Zealand", "", "Auckland")
    }

    #[test]
    fn test_facet_name_roundtrip() {
        for facet in Facet::ALL {
            assert_eq!(Facet::parse(facet.as_str()), Some(facet));
        }
        assert_eq!(Facet::parse("MANUFACTURER"), Some(Facet::Manufacturer));
        assert_eq!(Facet::parse("type"), Some(Facet::AircraftType));
        assert!(Facet::parse("registration").is_none());
        assert!("bogus".parse::<Facet>().is_err());
    }

    #[test]
    fn test_value_extraction() {
        let s = sample();
        assert_eq!(Facet::Year.value_of(&s), Some(FacetValue::Integer(2026)));
        assert_eq!(Facet::Month.value_of(&s), Some(FacetValue::Integer(1)));
        assert_eq!(Facet::Iata.value_of(&s), Some(FacetValue::text("NZ")));
        assert_eq!(Facet::Classification.value_of(&s), Some(FacetValue::Integer(1)));
        assert_eq!(Facet::City.value_of(&s), Some(FacetValue::text("Auckland")));
        assert_eq!(Facet::AircraftType.value_of(&s), None);
    }

    #[test]
    fn test_empty_string_is_no_value() {
        let s = sample();
        assert_eq!(s.state.as_deref(), Some(""));
        assert_eq!(Facet::State.value_of(&s), None);
    }

    #[test]
    fn test_search_corpus() {
        let corpus = search_corpus(&sample());
        assert_eq!(corpus, "boeing 787-9 b789 zk-nze auckland  new zealand");
    }

    #[test]
    fn test_search_corpus_skips_absent_fields() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let s = Sighting::new("Airbus", "A350", "A359", at);
        assert_eq!(search_corpus(&s), "airbus a350 a359");
    }

    #[test]
    fn test_parse_for_kind() {
        assert_eq!(FacetValue::parse_for(Facet::Year, "2025"), Ok(FacetValue::Integer(2025)));
        assert!(FacetValue::parse_for(Facet::Year, "last year").is_err());
        assert!(FacetValue::parse_for(Facet::City, "").is_err());
        assert_eq!(
            FacetValue::parse_for(Facet::City, "San Jose"),
            Ok(FacetValue::text("San Jose"))
        );
    }

    #[test]
    fn test_kinds_match_extracted_values() {
        let s = sample();
        for facet in Facet::ALL {
            if let Some(value) = facet.value_of(&s) {
                assert_eq!(value.kind(), facet.kind(), "facet {}", facet);
            }
        }
    }
}
