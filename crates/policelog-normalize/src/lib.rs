//! Police Log Normalize: turns ragged arrest-log table rows into records.
//!
//! Layout inference, positional field extraction, location recovery, text
//! cleanup, charge classification and date/time parsing. Everything here is
//! pure; geocoding and persistence live in other crates.

pub mod case_number;
pub mod charge;
pub mod datetime;
pub mod fields;
pub mod layout;
pub mod location;
pub mod normalizer;
pub mod tables;
pub mod text;

pub use case_number::CaseNumberFilter;
pub use charge::classify_charge;
pub use datetime::{parse_date_of_birth, parse_incident_datetime};
pub use fields::RawFields;
pub use layout::{ColumnLayout, ColumnRoles, Field};
pub use location::{LocationResolver, LocationSplit, LocationStrategy, TrailingLocationPattern};
pub use normalizer::Normalizer;
pub use tables::{clean_cell, select_arrest_rows, Table};
pub use text::{format_location, format_name};
