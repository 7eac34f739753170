//! Data types shared across the pipeline: raw rows in, arrest records out.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One extracted table row of string cells, positionally meaningful.
///
/// The first cell is the case number; everything after it may be missing or
/// shifted depending on how the upstream extractor split date and time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: Vec<String>,
}

impl RawRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Cell at `index`, or `""` when the row is shorter than that.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

impl<S: Into<String>> FromIterator<S> for RawRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Coarse legal-severity classification derived from offense text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeType {
    Misdemeanor,
    Felony,
    Violation,
    Infraction,
    #[default]
    Unknown,
}

impl ChargeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Misdemeanor => "Misdemeanor",
            Self::Felony => "Felony",
            Self::Violation => "Violation",
            Self::Infraction => "Infraction",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a stored label. Anything unrecognized maps to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Misdemeanor" => Self::Misdemeanor,
            "Felony" => Self::Felony,
            "Violation" => Self::Violation,
            "Infraction" => Self::Infraction,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ChargeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A latitude/longitude pair. `(0, 0)` means "not resolved".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_unresolved(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// The canonical record produced for every qualifying raw row.
///
/// Every field is always present; malformed inputs degrade to empty strings
/// or `None` instead of failing the row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrestRecord {
    pub case_number: String,
    pub incident_datetime: Option<NaiveDateTime>,
    pub offense: String,
    pub charge_type: ChargeType,
    pub location: String,
    pub arrestee_name: String,
    pub arrestee_date_of_birth: Option<NaiveDate>,
    pub arrestee_gender: String,
    pub arrestee_race: String,
    pub arrestee_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ArrestRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn with_coordinates(mut self, coords: Coordinates) -> Self {
        self.latitude = coords.latitude;
        self.longitude = coords.longitude;
        self
    }
}
