//! Persistence seam used by the record assembler and orchestrator.

use crate::{ArrestRecord, Result};

/// Destination for assembled records, with per-source-file bookkeeping.
///
/// Implementations own record identity (auto-increment ids, creation
/// timestamps) and must serialize writes for a given file.
pub trait ReportSink: Send + Sync {
    /// Whether a source document (file name or URL) was already seen.
    fn already_processed(&self, source: &str) -> Result<bool>;

    /// Get or create the id for a source document.
    fn file_id(&self, source: &str) -> Result<i64>;

    /// Insert one record for `file_id`. Returns the new record id.
    fn store(&self, file_id: i64, record: &ArrestRecord) -> Result<i64>;
}
