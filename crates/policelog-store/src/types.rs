//! Row types returned by store queries.

use chrono::{NaiveDate, NaiveDateTime};
use policelog_core::{ArrestRecord, ChargeType};
use serde::{Deserialize, Serialize};

/// An arrest report as stored, with its bookkeeping columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: i64,
    pub file_id: i64,
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
    pub created_at: String,
}

impl StoredReport {
    /// Drop bookkeeping columns.
    pub fn into_record(self) -> ArrestRecord {
        ArrestRecord {
            case_number: self.case_number,
            incident_datetime: self.incident_datetime,
            offense: self.offense,
            charge_type: self.charge_type,
            location: self.location,
            arrestee_name: self.arrestee_name,
            arrestee_date_of_birth: self.arrestee_date_of_birth,
            arrestee_gender: self.arrestee_gender,
            arrestee_race: self.arrestee_race,
            arrestee_address: self.arrestee_address,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A processed source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub id: i64,
    pub file_name: String,
    pub created_at: String,
}

/// Store-level statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_reports: i64,
    pub total_files: i64,
    pub geocoded_reports: i64,
    pub undated_reports: i64,
    pub db_path: String,
    pub db_size_mb: f64,
}
