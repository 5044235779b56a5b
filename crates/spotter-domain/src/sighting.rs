//! Sighting module - the record every query runs over

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unique identifier for a sighting based on UUIDv7
///
/// UUIDv7 sorts by creation time, so sightings recorded later always get a
/// larger identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SightingId(u128);

impl SightingId {
    /// Generate a new UUIDv7-based SightingId
    ///
    /// # Examples
    ///
    /// ```
    /// use spotter_domain::SightingId;
    ///
    /// let id = SightingId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a SightingId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a SightingId from its hyphenated UUID form
    ///
    /// # Examples
    ///
    /// ```
    /// use spotter_domain::SightingId;
    ///
    /// let id = SightingId::new();
    /// let parsed = SightingId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid sighting id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for SightingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SightingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl Serialize for SightingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SightingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_string(&raw).map_err(serde::de::Error::custom)
    }
}

/// One captured aircraft sighting
///
/// A sighting is treated as an immutable snapshot for the duration of a
/// query. Optional attributes that are `None` or empty never match a concrete
/// facet selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    /// Unique identifier
    pub id: SightingId,

    /// Aircraft manufacturer, e.g. "Boeing"
    pub manufacturer: String,

    /// Aircraft model, e.g. "787-9"
    pub model: String,

    /// ICAO aircraft type designator, e.g. "B789"
    pub icao: String,

    /// IATA airline code of the operator
    pub iata: Option<String>,

    /// Registration mark, e.g. "N12345"
    pub registration: Option<String>,

    /// Aircraft classification code
    pub classification: Option<u8>,

    /// Aircraft type code (landplane, helicopter, ...)
    pub aircraft_type: Option<String>,

    /// Country the sighting was captured in
    pub country: Option<String>,

    /// State or region the sighting was captured in
    pub state: Option<String>,

    /// City the sighting was captured in
    pub city: Option<String>,

    /// Capture year
    pub year: i32,

    /// Capture month, 1-12
    pub month: u32,

    /// When the sighting was captured
    pub captured_at: DateTime<Utc>,

    /// Reference to the stored photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// GPS latitude of the capture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// GPS longitude of the capture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// User rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,

    /// Registered owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Airworthiness certification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification: Option<String>,
}

impl Sighting {
    /// Create a new sighting with only the required attributes
    ///
    /// Year and month are taken from `captured_at`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use spotter_domain::Sighting;
    ///
    /// let at = Utc.with_ymd_and_hms(2026, 1, 14, 9, 30, 0).unwrap();
    /// let sighting = Sighting::new("Boeing", "787-9", "B789", at);
    /// assert_eq!((sighting.year, sighting.month), (2026, 1));
    /// ```
    pub fn new(
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        icao: impl Into<String>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SightingId::new(),
            manufacturer: manufacturer.into(),
            model: model.into(),
            icao: icao.into(),
            iata: None,
            registration: None,
            classification: None,
            aircraft_type: None,
            country: None,
            state: None,
            city: None,
            year: captured_at.year(),
            month: captured_at.month(),
            captured_at,
            photo: None,
            latitude: None,
            longitude: None,
            rating: None,
            owner: None,
            certification: None,
        }
    }

    /// Override the period the sighting is filed under
    pub fn with_period(mut self, year: i32, month: u32) -> Self {
        self.year = year;
        self.month = month;
        self
    }

    /// Set the operator's IATA code
    pub fn with_iata(mut self, iata: impl Into<String>) -> Self {
        self.iata = Some(iata.into());
        self
    }

    /// Set the registration mark
    pub fn with_registration(mut self, registration: impl Into<String>) -> Self {
        self.registration = Some(registration.into());
        self
    }

    /// Set the classification code
    pub fn with_classification(mut self, classification: u8) -> Self {
        self.classification = Some(classification);
        self
    }

    /// Set the aircraft type code
    pub fn with_aircraft_type(mut self, aircraft_type: impl Into<String>) -> Self {
        self.aircraft_type = Some(aircraft_type.into());
        self
    }

    /// Set the capture location; empty parts are stored as given
    pub fn with_location(
        mut self,
        country: impl Into<String>,
        state: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        self.country = Some(country.into());
        self.state = Some(state.into());
        self.city = Some(city.into());
        self
    }
}
