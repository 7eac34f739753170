//! Column layout detection.
//!
//! Upstream table extraction sometimes merges the date and time into a
//! single cell, which shifts every later column left by one. The layout is
//! inferred once per row and turned into an explicit role → index map so
//! field extraction never does offset arithmetic inline.

use policelog_core::RawRow;

/// Semantic role of a column in an arrest-log row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CaseNumber,
    Date,
    Time,
    Offense,
    Location,
    ArresteeName,
    ArresteeDateOfBirth,
    ArresteeGender,
    ArresteeRace,
    ArresteeAddress,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::CaseNumber,
        Field::Date,
        Field::Time,
        Field::Offense,
        Field::Location,
        Field::ArresteeName,
        Field::ArresteeDateOfBirth,
        Field::ArresteeGender,
        Field::ArresteeRace,
        Field::ArresteeAddress,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Inferred position of the time cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub time_index: usize,
}

impl ColumnLayout {
    /// Date and time in separate cells.
    pub const SPLIT: ColumnLayout = ColumnLayout { time_index: 2 };
    /// Date and time merged into the date cell.
    pub const MERGED: ColumnLayout = ColumnLayout { time_index: 1 };

    /// A time cell longer than four characters means the real time value
    /// was merged into the date cell and cell 2 already holds the offense.
    pub fn detect(row: &RawRow) -> Self {
        if row.cell(2).chars().count() > 4 {
            Self::MERGED
        } else {
            Self::SPLIT
        }
    }

    pub fn is_merged(&self) -> bool {
        *self == Self::MERGED
    }

    /// Resolve every field role to its column index.
    pub fn roles(&self) -> ColumnRoles {
        let t = self.time_index;
        let mut indices = [0usize; Field::ALL.len()];
        for field in Field::ALL {
            indices[field.slot()] = match field {
                Field::CaseNumber => 0,
                Field::Date => 1,
                Field::Time => 2,
                Field::Offense => t + 1,
                Field::Location => t + 2,
                Field::ArresteeName => t + 3,
                Field::ArresteeDateOfBirth => t + 4,
                Field::ArresteeGender => t + 5,
                Field::ArresteeRace => t + 6,
                Field::ArresteeAddress => t + 7,
            };
        }
        ColumnRoles { indices }
    }
}

/// Mapping from field role to resolved column index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoles {
    indices: [usize; Field::ALL.len()],
}

impl ColumnRoles {
    pub fn index(&self, field: Field) -> usize {
        self.indices[field.slot()]
    }

    /// Cell for `field`, or `""` when the row does not reach that far.
    pub fn get<'r>(&self, row: &'r RawRow, field: Field) -> &'r str {
        row.cell(self.index(field))
    }
}
