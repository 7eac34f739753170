//! Table extraction from source documents.
//!
//! tabula-java emits an array of tables, each shaped like
//! `{"data": [[{"text": "25-001", ...}, ...], ...]}`. Both extractors below
//! funnel through [`parse_tabula_json`].

use std::path::{Path, PathBuf};
use std::process::Command;

use policelog_core::{Error, RawRow, Result};
use policelog_normalize::Table;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct TabulaTable {
    #[serde(default)]
    data: Vec<Vec<TabulaCell>>,
}

#[derive(Debug, Deserialize)]
struct TabulaCell {
    #[serde(default)]
    text: String,
}

/// Parse tabula-java JSON into tables of raw rows.
pub fn parse_tabula_json(json: &str) -> Result<Vec<Table>> {
    let tables: Vec<TabulaTable> = serde_json::from_str(json)?;
    Ok(tables
        .into_iter()
        .map(|t| {
            t.data
                .into_iter()
                .map(|row| row.into_iter().map(|c| c.text).collect::<RawRow>())
                .collect()
        })
        .collect())
}

/// Turns a source document into its tables.
pub trait TableExtractor: Send + Sync {
    fn extract_tables(&self, document: &Path) -> Result<Vec<Table>>;
}

/// Reads tabula JSON that was produced ahead of time.
///
/// For `log_7.pdf` this looks for `log_7.json` beside it; a path that
/// already ends in `.json` is read directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabulaJsonExtractor;

impl TabulaJsonExtractor {
    pub fn sidecar_path(document: &Path) -> PathBuf {
        if document.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
            document.to_path_buf()
        } else {
            document.with_extension("json")
        }
    }
}

impl TableExtractor for TabulaJsonExtractor {
    fn extract_tables(&self, document: &Path) -> Result<Vec<Table>> {
        let path = Self::sidecar_path(document);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            Error::Extraction(format!("Cannot read tables from {}: {}", path.display(), e))
        })?;
        let tables = parse_tabula_json(&json)?;
        debug!("{}: {} tables", path.display(), tables.len());
        Ok(tables)
    }
}

/// Runs the tabula-java CLI on a PDF in stream mode over all pages.
#[derive(Debug, Clone)]
pub struct TabulaCliExtractor {
    jar: PathBuf,
    java: String,
}

impl TabulaCliExtractor {
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        Self {
            jar: jar.into(),
            java: "java".into(),
        }
    }

    /// Use a specific `java` executable.
    pub fn with_java(mut self, java: impl Into<String>) -> Self {
        self.java = java.into();
        self
    }

    fn command(&self, document: &Path) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.arg("-jar")
            .arg(&self.jar)
            .args(["--format", "JSON", "--pages", "all", "--stream"])
            .arg(document);
        cmd
    }
}

impl TableExtractor for TabulaCliExtractor {
    fn extract_tables(&self, document: &Path) -> Result<Vec<Table>> {
        info!("Extracting tables from {}", document.display());
        let output = self.command(document).output().map_err(|e| {
            Error::Extraction(format!("Failed to run {}: {}", self.java, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Extraction(format!(
                "tabula exited with {} for {}: {}",
                output.status,
                document.display(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_tabula_json(&stdout)
    }
}
