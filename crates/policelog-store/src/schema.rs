//! Database schema SQL.

/// Arrest reports and the source files they were read from.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS arrest_reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL,
    case_number TEXT NOT NULL,
    incident_datetime TIMESTAMP,
    offense TEXT,
    charge_type TEXT,
    location TEXT,
    arrestee_name TEXT,
    arrestee_date_of_birth DATE,
    arrestee_gender TEXT,
    arrestee_race TEXT,
    arrestee_address TEXT,
    latitude DECIMAL,
    longitude DECIMAL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS arrest_reports_files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_arrest_reports_file_id ON arrest_reports(file_id);
CREATE INDEX IF NOT EXISTS idx_arrest_reports_files_name ON arrest_reports_files(file_name);
"#;

/// Stored timestamp text format.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Stored date-of-birth text format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
