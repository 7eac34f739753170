//! Record assembly: normalize, geocode, store. One row at a time.

use policelog_core::{RawRow, ReportSink, Result};
use policelog_geo::Geocoder;
use policelog_normalize::Normalizer;
use tracing::{debug, warn};

use crate::types::{FileReport, RowFailure};

/// Composes the normalizer, geocoder and sink for the rows of one file.
pub struct RecordAssembler<'a, G, S> {
    normalizer: &'a Normalizer,
    geocoder: &'a G,
    sink: &'a S,
}

impl<'a, G: Geocoder, S: ReportSink> RecordAssembler<'a, G, S> {
    pub fn new(normalizer: &'a Normalizer, geocoder: &'a G, sink: &'a S) -> Self {
        Self {
            normalizer,
            geocoder,
            sink,
        }
    }

    /// Assemble and store one row. Returns the stored record id.
    pub async fn assemble(&self, file_id: i64, row: &RawRow) -> Result<i64> {
        let record = self.normalizer.normalize(row)?;
        let coords = self.geocoder.locate(&record.location).await;
        let record = record.with_coordinates(coords);
        let id = self.sink.store(file_id, &record)?;
        debug!("Stored {} as report {}", record.case_number, id);
        Ok(id)
    }

    /// Assemble every row, skipping the ones that fail.
    pub async fn assemble_all(&self, source: &str, file_id: i64, rows: &[RawRow]) -> FileReport {
        let mut report = FileReport {
            source: source.to_string(),
            file_id,
            rows_seen: rows.len(),
            ..Default::default()
        };

        for (row_index, row) in rows.iter().enumerate() {
            match self.assemble(file_id, row).await {
                Ok(id) => report.stored.push(id),
                Err(e) => {
                    warn!("Error processing row {:?}: {}", row.cells(), e);
                    report.failures.push(RowFailure {
                        row_index,
                        cells: row.cells().to_vec(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
