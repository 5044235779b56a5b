//! Spotter Storage Layer
//!
//! Implements the [`SightingSource`] and [`PreferenceStore`] traits on top of
//! SQLite, plus an in-memory preference store.
//!
//! # Architecture
//!
//! - `sightings` table for the captured records
//! - `preferences` table for string-keyed settings such as the saved filter
//!
//! # Examples
//!
//! ```no_run
//! use spotter_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for sighting and preference operations
//! ```

#![warn(missing_docs)]

mod memory;

pub use memory::MemoryPreferenceStore;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use spotter_domain::{PreferenceStore, PreferenceValue, Sighting, SightingId, SightingSource};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Duplicate sighting detected
    #[error("Duplicate sighting: {0}")]
    Duplicate(SightingId),
}

const SIGHTING_COLUMNS: &str = "id, manufacturer, model, icao, iata, registration, classification, \
     aircraft_type, country, state, city, year, month, captured_at, photo, latitude, longitude, \
     rating, owner, certification";

/// SQLite-based store for sightings and preferences
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use spotter_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("spotter.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        tracing::debug!("Opened sighting store at {}", path.as_ref().display());
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert SightingId to bytes for storage
    fn sighting_id_to_bytes(id: SightingId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to SightingId
    fn bytes_to_sighting_id(bytes: &[u8]) -> Result<SightingId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for SightingId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(SightingId::from_value(u128::from_be_bytes(arr)))
    }

    fn row_to_sighting(row: &Row<'_>) -> rusqlite::Result<Sighting> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_sighting_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let captured_millis: i64 = row.get(13)?;
        let captured_at = DateTime::<Utc>::from_timestamp_millis(captured_millis).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                13,
                rusqlite::types::Type::Integer,
                Box::new(StoreError::InvalidData(format!(
                    "Timestamp out of range: {}",
                    captured_millis
                ))),
            )
        })?;

        Ok(Sighting {
            id,
            manufacturer: row.get(1)?,
            model: row.get(2)?,
            icao: row.get(3)?,
            iata: row.get(4)?,
            registration: row.get(5)?,
            classification: row.get(6)?,
            aircraft_type: row.get(7)?,
            country: row.get(8)?,
            state: row.get(9)?,
            city: row.get(10)?,
            year: row.get(11)?,
            month: row.get(12)?,
            captured_at,
            photo: row.get(14)?,
            latitude: row.get(15)?,
            longitude: row.get(16)?,
            rating: row.get(17)?,
            owner: row.get(18)?,
            certification: row.get(19)?,
        })
    }

    /// Delete every stored sighting, returning how many were removed
    pub fn clear_sightings(&mut self) -> Result<usize, StoreError> {
        Ok(self.conn.execute("DELETE FROM sightings", [])?)
    }
}

impl SightingSource for SqliteStore {
    type Error = StoreError;

    fn add_sighting(&mut self, sighting: Sighting) -> Result<(), Self::Error> {
        let id_bytes = Self::sighting_id_to_bytes(sighting.id);

        let exists: bool = self
            .conn
            .query_row("SELECT 1 FROM sightings WHERE id = ?1", params![&id_bytes], |_| Ok(true))
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::Duplicate(sighting.id));
        }

        self.conn.execute(
            &format!(
                "INSERT INTO sightings ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, \
                 ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
                SIGHTING_COLUMNS
            ),
            params![
                &id_bytes,
                &sighting.manufacturer,
                &sighting.model,
                &sighting.icao,
                &sighting.iata,
                &sighting.registration,
                sighting.classification,
                &sighting.aircraft_type,
                &sighting.country,
                &sighting.state,
                &sighting.city,
                sighting.year,
                sighting.month,
                sighting.captured_at.timestamp_millis(),
                &sighting.photo,
                sighting.latitude,
                sighting.longitude,
                sighting.rating,
                &sighting.owner,
                &sighting.certification,
            ],
        )?;

        Ok(())
    }

    fn list_sightings(&self) -> Result<Vec<Sighting>, Self::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM sightings ORDER BY captured_at DESC, id DESC",
            SIGHTING_COLUMNS
        ))?;

        let sightings = stmt
            .query_map([], Self::row_to_sighting)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sightings)
    }

    fn count(&self) -> Result<usize, Self::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sightings", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl PreferenceStore for SqliteStore {
    type Error = StoreError;

    fn get(&self, key: &str) -> Result<Option<PreferenceValue>, Self::Error> {
        let row: Option<(Option<String>, Option<i64>)> = self
            .conn
            .query_row(
                "SELECT text_value, int_value FROM preferences WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((Some(text), _)) => Ok(Some(PreferenceValue::Text(text))),
            Some((None, Some(n))) => Ok(Some(PreferenceValue::Integer(n))),
            Some((None, None)) => Err(StoreError::InvalidData(format!(
                "Preference {} has no value",
                key
            ))),
        }
    }

    fn set(&mut self, key: &str, value: Option<PreferenceValue>) -> Result<(), Self::Error> {
        write_preference(&self.conn, key, value.as_ref())
    }

    fn set_all(
        &mut self,
        entries: &[(String, Option<PreferenceValue>)],
    ) -> Result<(), Self::Error> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            write_preference(&tx, key, value.as_ref())?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn write_preference(
    conn: &Connection,
    key: &str,
    value: Option<&PreferenceValue>,
) -> Result<(), StoreError> {
    let (text, int) = match value {
        None => {
            conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
            return Ok(());
        }
        Some(PreferenceValue::Text(text)) => (Some(text.as_str()), None),
        Some(PreferenceValue::Integer(n)) => (None, Some(*n)),
    };

    conn.execute(
        "INSERT INTO preferences (key, text_value, int_value) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
         text_value = excluded.text_value, int_value = excluded.int_value",
        params![key, text, int],
    )?;
    Ok(())
}
