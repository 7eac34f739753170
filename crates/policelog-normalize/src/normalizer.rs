//! Row → record normalization: the pure half of record assembly.

use policelog_core::{ArrestRecord, Error, RawRow, Result};
use tracing::debug;

use crate::charge::classify_charge;
use crate::datetime::{parse_date_of_birth, parse_incident_datetime};
use crate::fields::RawFields;
use crate::layout::ColumnLayout;
use crate::location::LocationResolver;
use crate::text::{format_location, format_name, strip_leading_period};

/// Turns one raw row into an [`ArrestRecord`] with unresolved coordinates.
///
/// Holds no per-row state; a single instance can normalize any number of
/// rows, from any number of threads.
#[derive(Default)]
pub struct Normalizer {
    resolver: LocationResolver,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(resolver: LocationResolver) -> Self {
        Self { resolver }
    }

    /// Normalize a row. Only a row without a case number is rejected; every
    /// other malformed field degrades to an empty or absent value.
    pub fn normalize(&self, row: &RawRow) -> Result<ArrestRecord> {
        let layout = ColumnLayout::detect(row);
        let fields = RawFields::extract(row, &layout.roles());

        let case_number = fields.case_number.trim();
        if case_number.is_empty() {
            return Err(Error::Normalize(format!(
                "row has no case number: {:?}",
                row.cells()
            )));
        }

        // Classify before the location split can truncate the offense.
        let charge_type = classify_charge(&fields.offense);
        let split = self.resolver.resolve(&fields.offense, &fields.location);

        let record = ArrestRecord {
            case_number: case_number.to_string(),
            incident_datetime: parse_incident_datetime(&fields.date, &fields.time),
            offense: split.offense,
            charge_type,
            location: format_location(&split.location),
            arrestee_name: format_name(&fields.arrestee_name),
            arrestee_date_of_birth: parse_date_of_birth(&fields.arrestee_date_of_birth),
            arrestee_gender: fields.arrestee_gender,
            arrestee_race: fields.arrestee_race,
            arrestee_address: strip_leading_period(&fields.arrestee_address).to_string(),
            latitude: 0.0,
            longitude: 0.0,
        };

        debug!(
            "Normalized {} (layout time_index={}, charge={})",
            record.case_number, layout.time_index, record.charge_type
        );
        Ok(record)
    }
}
