//! Runtime types.

use serde::Serialize;

/// A row that could not be turned into a stored record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFailure {
    /// Position among the selected rows of the document.
    pub row_index: usize,
    pub cells: Vec<String>,
    pub reason: String,
}

/// Result of assembling every selected row of one document.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub source: String,
    pub file_id: i64,
    /// Rows that qualified as arrest rows.
    pub rows_seen: usize,
    /// Ids of stored records, in row order.
    pub stored: Vec<i64>,
    pub failures: Vec<RowFailure>,
}

impl FileReport {
    pub fn stored_count(&self) -> usize {
        self.stored.len()
    }
}

/// What happened to one source document during a run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FileOutcome {
    Processed(FileReport),
    #[serde(rename_all = "camelCase")]
    AlreadyProcessed { source: String },
    #[serde(rename_all = "camelCase")]
    Failed {
        source: String,
        file_id: Option<i64>,
        error: String,
    },
}

impl FileOutcome {
    pub fn source(&self) -> &str {
        match self {
            Self::Processed(report) => &report.source,
            Self::AlreadyProcessed { source } | Self::Failed { source, .. } => source,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Summary of one discovery-and-ingest run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub outcomes: Vec<FileOutcome>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn processed(&self) -> impl Iterator<Item = &FileReport> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Processed(report) => Some(report),
            _ => None,
        })
    }

    pub fn stored_total(&self) -> usize {
        self.processed().map(FileReport::stored_count).sum()
    }

    pub fn row_failures_total(&self) -> usize {
        self.processed().map(|r| r.failures.len()).sum()
    }

    pub fn failed_files(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped_files(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::AlreadyProcessed { .. }))
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_files() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let outcome = FileOutcome::Failed {
            source: "https://example.org/log.pdf".into(),
            file_id: Some(3),
            error: "HTTP error: 404".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["fileId"], 3);

        let processed = FileOutcome::Processed(FileReport {
            source: "a.pdf".into(),
            file_id: 1,
            rows_seen: 2,
            stored: vec![10],
            failures: vec![],
        });
        let json = serde_json::to_value(&processed).unwrap();
        assert_eq!(json["status"], "processed");
        assert_eq!(json["rowsSeen"], 2);

        let skipped = serde_json::to_value(FileOutcome::AlreadyProcessed { source: "b.pdf".into() }).unwrap();
        assert_eq!(skipped["status"], "alreadyProcessed");
    }

    #[test]
    fn test_run_report_totals() {
        let report = RunReport {
            outcomes: vec![
                FileOutcome::Processed(FileReport {
                    source: "a".into(),
                    file_id: 1,
                    rows_seen: 3,
                    stored: vec![1, 2],
                    failures: vec![RowFailure {
                        row_index: 2,
                        cells: vec![],
                        reason: "bad".into(),
                    }],
                }),
                FileOutcome::AlreadyProcessed { source: "b".into() },
                FileOutcome::Failed {
                    source: "c".into(),
                    file_id: None,
                    error: "x".into(),
                },
            ],
            duration_ms: 5,
        };
        assert_eq!(report.stored_total(), 2);
        assert_eq!(report.row_failures_total(), 1);
        assert_eq!(report.skipped_files(), 1);
        assert_eq!(report.failed_files(), 1);
        assert!(report.has_failures());
        assert_eq!(report.outcomes[2].source(), "c");
    }
}
