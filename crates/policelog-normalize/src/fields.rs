//! Positional field extraction driven by a resolved column-role map.

use policelog_core::RawRow;

use crate::layout::{ColumnRoles, Field};

/// The semantic fields of one row, still as raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub case_number: String,
    pub date: String,
    pub time: String,
    pub offense: String,
    pub location: String,
    pub arrestee_name: String,
    pub arrestee_date_of_birth: String,
    pub arrestee_gender: String,
    pub arrestee_race: String,
    pub arrestee_address: String,
}

impl RawFields {
    /// Slice out every field. Trailing arrestee columns are often omitted
    /// upstream; missing cells come back as empty strings.
    pub fn extract(row: &RawRow, roles: &ColumnRoles) -> Self {
        let get = |field| roles.get(row, field).to_string();
        Self {
            case_number: get(Field::CaseNumber),
            date: get(Field::Date),
            time: get(Field::Time),
            offense: get(Field::Offense),
            location: get(Field::Location),
            arrestee_name: get(Field::ArresteeName),
            arrestee_date_of_birth: get(Field::ArresteeDateOfBirth),
            arrestee_gender: get(Field::ArresteeGender),
            arrestee_race: get(Field::ArresteeRace),
            arrestee_address: get(Field::ArresteeAddress),
        }
    }
}
