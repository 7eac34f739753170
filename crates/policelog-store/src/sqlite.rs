//! SQLite-backed arrest report store.
//!
//! Insert-only: records get an auto-increment id and a server-set
//! `created_at`. Source documents are tracked by name so each one is
//! processed at most once.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::schema::{DATETIME_FORMAT, DATE_FORMAT, SCHEMA_SQL};
use crate::types::*;
use policelog_core::{ArrestRecord, ChargeType, Error, ReportSink, Result};

pub const DB_FILE_NAME: &str = "arrest_reports.db";

/// SQLite store for arrest reports and processed source files.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the store.
    ///
    /// `db_dir` is the directory (e.g., `data/db/`). The file will be
    /// `db_dir/arrest_reports.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join(DB_FILE_NAME);

        let conn = Self::create_connection(&db_path)?;
        Self::init_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        info!(
            "SqliteStore initialized: {} reports, {} files, path={}",
            store.count_reports()?,
            store.count_files()?,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ---------------------------------------------------------------
    // Source files
    // ---------------------------------------------------------------

    /// Whether a source file (name or URL) has been recorded.
    pub fn file_exists(&self, file_name: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let id: Option<i64> = conn
            .prepare_cached("SELECT id FROM arrest_reports_files WHERE file_name = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![file_name], |row| row.get(0))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id.is_some())
    }

    /// Return the id of a source file, inserting it first if needed.
    pub fn get_or_create_file_id(&self, file_name: &str) -> Result<i64> {
        let conn = self.conn.lock();
        let existing: Option<i64> = conn
            .prepare_cached("SELECT id FROM arrest_reports_files WHERE file_name = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![file_name], |row| row.get(0))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        if let Some(id) = existing {
            return Ok(id);
        }

        let id = conn
            .prepare_cached("INSERT INTO arrest_reports_files (file_name) VALUES (?1)")
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![file_name])
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!("Registered source file {} as {}", file_name, id);
        Ok(id)
    }

    /// All processed source files, oldest first.
    pub fn list_files(&self) -> Result<Vec<SourceFile>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT id, file_name, created_at FROM arrest_reports_files ORDER BY id")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SourceFile {
                    id: row.get(0)?,
                    file_name: row.get(1)?,
                    created_at: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?;
        let files = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(files)
    }

    pub fn count_files(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM arrest_reports_files", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Reports
    // ---------------------------------------------------------------

    /// Insert one record. Returns the new report id.
    pub fn insert_record(&self, file_id: i64, record: &ArrestRecord) -> Result<i64> {
        let incident = record
            .incident_datetime
            .map(|dt| dt.format(DATETIME_FORMAT).to_string());
        let dob = record
            .arrestee_date_of_birth
            .map(|d| d.format(DATE_FORMAT).to_string());

        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO arrest_reports (
                    file_id, case_number, incident_datetime, offense, charge_type, location,
                    arrestee_name, arrestee_date_of_birth, arrestee_gender,
                    arrestee_race, arrestee_address, latitude, longitude
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                file_id,
                record.case_number,
                incident,
                record.offense,
                record.charge_type.as_str(),
                record.location,
                record.arrestee_name,
                dob,
                record.arrestee_gender,
                record.arrestee_race,
                record.arrestee_address,
                record.latitude,
                record.longitude,
            ])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Get a report by id.
    pub fn get_report(&self, id: i64) -> Result<Option<StoredReport>> {
        let conn = self.conn.lock();
        let report = conn
            .prepare_cached("SELECT * FROM arrest_reports WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![id], |row| Ok(Self::row_to_report(row)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(report)
    }

    /// All reports in insertion order.
    pub fn list_reports(&self) -> Result<Vec<StoredReport>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM arrest_reports ORDER BY id")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| Ok(Self::row_to_report(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Reports read from one source file, in insertion order.
    pub fn reports_for_file(&self, file_id: i64) -> Result<Vec<StoredReport>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM arrest_reports WHERE file_id = ?1 ORDER BY id")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![file_id], |row| Ok(Self::row_to_report(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    pub fn count_reports(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM arrest_reports", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    pub fn get_stats(&self) -> Result<StoreStats> {
        let total_reports = self.count_reports()?;
        let total_files = self.count_files()?;

        let conn = self.conn.lock();
        let geocoded_reports: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM arrest_reports WHERE latitude != 0 OR longitude != 0",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let undated_reports: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM arrest_reports WHERE incident_datetime IS NULL",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        drop(conn);

        let db_size = std::fs::metadata(&self.db_path).map(|m| m.len()).unwrap_or(0);

        Ok(StoreStats {
            total_reports,
            total_files,
            geocoded_reports,
            undated_reports,
            db_path: self.db_path.to_string_lossy().to_string(),
            db_size_mb: db_size as f64 / (1024.0 * 1024.0),
        })
    }

    // ---------------------------------------------------------------
    // Row Mapping Helpers
    // ---------------------------------------------------------------

    fn row_to_report(row: &rusqlite::Row<'_>) -> StoredReport {
        let text = |col: &str| -> String {
            row.get::<_, Option<String>>(col)
                .ok()
                .flatten()
                .unwrap_or_default()
        };
        StoredReport {
            id: row.get("id").unwrap_or(0),
            file_id: row.get("file_id").unwrap_or(0),
            case_number: text("case_number"),
            incident_datetime: row
                .get::<_, Option<String>>("incident_datetime")
                .ok()
                .flatten()
                .and_then(|s| NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).ok()),
            offense: text("offense"),
            charge_type: ChargeType::from_label(&text("charge_type")),
            location: text("location"),
            arrestee_name: text("arrestee_name"),
            arrestee_date_of_birth: row
                .get::<_, Option<String>>("arrestee_date_of_birth")
                .ok()
                .flatten()
                .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
            arrestee_gender: text("arrestee_gender"),
            arrestee_race: text("arrestee_race"),
            arrestee_address: text("arrestee_address"),
            latitude: row.get::<_, Option<f64>>("latitude").ok().flatten().unwrap_or(0.0),
            longitude: row.get::<_, Option<f64>>("longitude").ok().flatten().unwrap_or(0.0),
            created_at: text("created_at"),
        }
    }
}

impl ReportSink for SqliteStore {
    fn already_processed(&self, source: &str) -> Result<bool> {
        self.file_exists(source)
    }

    fn file_id(&self, source: &str) -> Result<i64> {
        self.get_or_create_file_id(source)
    }

    fn store(&self, file_id: i64, record: &ArrestRecord) -> Result<i64> {
        self.insert_record(file_id, record)
    }
}
