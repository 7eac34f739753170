//! Response shape tests: stored reports must serialize with the field names
//! and types the map frontend's `ArrestReport` interface reads.

use chrono::NaiveDate;
use policelog_core::{ArrestRecord, ChargeType};
use policelog_store::SqliteStore;

fn stored_report_json() -> serde_json::Value {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path()).unwrap();
    let file_id = store.get_or_create_file_id("log_1.pdf").unwrap();
    let record = ArrestRecord {
        case_number: "25-001".into(),
        incident_datetime: NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0),
        offense: "Burglary (F)".into(),
        charge_type: ChargeType::Felony,
        location: "500 Block University Ave".into(),
        arrestee_name: "John Smith".into(),
        arrestee_date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
        arrestee_gender: "M".into(),
        arrestee_race: "W".into(),
        arrestee_address: "123 Elm".into(),
        latitude: 37.4449,
        longitude: -122.1611,
    };
    let id = store.insert_record(file_id, &record).unwrap();
    serde_json::to_value(store.get_report(id).unwrap().unwrap()).unwrap()
}

/// `{ id, file_id, case_number, incident_datetime, ..., created_at }`
#[test]
fn test_report_field_names() {
    let report = stored_report_json();
    let expected = [
        "id",
        "file_id",
        "case_number",
        "incident_datetime",
        "offense",
        "charge_type",
        "location",
        "arrestee_name",
        "arrestee_date_of_birth",
        "arrestee_gender",
        "arrestee_race",
        "arrestee_address",
        "latitude",
        "longitude",
        "created_at",
    ];
    let object = report.as_object().unwrap();
    assert_eq!(object.len(), expected.len());
    for field in expected {
        assert!(object.contains_key(field), "missing field {}", field);
    }
}

#[test]
fn test_report_field_types() {
    let report = stored_report_json();
    assert!(report["id"].is_number());
    assert!(report["file_id"].is_number());
    assert!(report["latitude"].is_number());
    assert!(report["longitude"].is_number());
    assert_eq!(report["charge_type"], "Felony");
    assert_eq!(report["incident_datetime"], "2025-03-01T08:00:00");
    assert_eq!(report["arrestee_date_of_birth"], "1990-01-01");
    assert!(report["created_at"].is_string());
}

/// Missing timestamps serialize as null, not as an empty string.
#[test]
fn test_absent_dates_are_null() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path()).unwrap();
    let id = store
        .insert_record(
            store.get_or_create_file_id("log_2.pdf").unwrap(),
            &ArrestRecord {
                case_number: "25-002".into(),
                ..Default::default()
            },
        )
        .unwrap();
    let report = serde_json::to_value(store.get_report(id).unwrap().unwrap()).unwrap();
    assert!(report["incident_datetime"].is_null());
    assert!(report["arrestee_date_of_birth"].is_null());
    assert_eq!(report["charge_type"], "Unknown");
}
