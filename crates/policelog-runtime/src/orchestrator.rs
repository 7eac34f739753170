//! Pipeline: drives source documents through assembly, at most once each.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use policelog_core::{DataPaths, Error, ReportSink, Result};
use policelog_geo::Geocoder;
use policelog_normalize::{select_arrest_rows, CaseNumberFilter, Normalizer, Table};
use policelog_sources::{DocumentDownloader, LogListingClient, TableExtractor};
use tracing::{error, info, warn};

use crate::assembler::RecordAssembler;
use crate::types::*;

/// Coordinates discovery, download, extraction and record assembly.
pub struct Pipeline<G, S> {
    normalizer: Normalizer,
    geocoder: G,
    sink: S,
    filter: CaseNumberFilter,
    data_paths: DataPaths,
}

impl<G: Geocoder, S: ReportSink> Pipeline<G, S> {
    pub fn new(geocoder: G, sink: S, filter: CaseNumberFilter, data_paths: DataPaths) -> Self {
        Self {
            normalizer: Normalizer::new(),
            geocoder,
            sink,
            filter,
            data_paths,
        }
    }

    /// Replace the default normalizer (e.g. with extra location strategies).
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Ingest the tables of one source document.
    ///
    /// The processed-check happens before anything else; a source seen
    /// before yields `AlreadyProcessed` and touches nothing.
    pub async fn ingest_document(&self, source: &str, tables: &[Table]) -> Result<FileOutcome> {
        if self.sink.already_processed(source)? {
            info!("Skipping already processed document: {}", source);
            return Ok(FileOutcome::AlreadyProcessed {
                source: source.to_string(),
            });
        }
        let file_id = self.sink.file_id(source)?;
        Ok(FileOutcome::Processed(
            self.assemble_tables(source, file_id, tables).await,
        ))
    }

    async fn assemble_tables(&self, source: &str, file_id: i64, tables: &[Table]) -> FileReport {
        let rows = select_arrest_rows(tables, &self.filter);
        if rows.is_empty() {
            warn!("No arrest report rows found in {}", source);
        }

        let assembler = RecordAssembler::new(&self.normalizer, &self.geocoder, &self.sink);
        let report = assembler.assemble_all(source, file_id, &rows).await;
        info!(
            "{}: {} rows, {} stored, {} skipped",
            source,
            report.rows_seen,
            report.stored_count(),
            report.failures.len()
        );
        report
    }

    /// Process one discovered document URL. Never returns an error: every
    /// failure becomes a `Failed` outcome.
    pub async fn process_url(
        &self,
        url: &str,
        downloader: &DocumentDownloader,
        extractor: &Arc<dyn TableExtractor>,
    ) -> FileOutcome {
        let failed = |file_id: Option<i64>, e: policelog_core::Error| {
            error!("Failed to process {}: {}", url, e);
            FileOutcome::Failed {
                source: url.to_string(),
                file_id,
                error: e.to_string(),
            }
        };

        match self.sink.already_processed(url) {
            Ok(true) => {
                info!("Skipping already processed log: {}", url);
                return FileOutcome::AlreadyProcessed {
                    source: url.to_string(),
                };
            }
            Ok(false) => {}
            Err(e) => return failed(None, e),
        }

        // The id is taken before download, so a failed download is not
        // retried on later runs.
        let file_id = match self.sink.file_id(url) {
            Ok(id) => id,
            Err(e) => return failed(None, e),
        };

        let dest = self.data_paths.download_path(file_id);
        if let Err(e) = downloader.download(url, &dest).await {
            return failed(Some(file_id), e);
        }

        let tables = match extract_off_runtime(extractor, dest).await {
            Ok(tables) => tables,
            Err(e) => return failed(Some(file_id), e),
        };

        FileOutcome::Processed(self.assemble_tables(url, file_id, &tables).await)
    }

    /// Discover documents on the listing page and process each one.
    pub async fn run(
        &self,
        listing: &LogListingClient,
        downloader: &DocumentDownloader,
        extractor: &Arc<dyn TableExtractor>,
    ) -> Result<RunReport> {
        let start = Instant::now();
        let urls = listing.discover().await?;

        let mut outcomes = Vec::with_capacity(urls.len());
        for url in &urls {
            outcomes.push(self.process_url(url, downloader, extractor).await);
        }

        let report = RunReport {
            outcomes,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Run complete: {} documents, {} records stored, {} skipped, {} failed ({}ms)",
            report.outcomes.len(),
            report.stored_total(),
            report.skipped_files(),
            report.failed_files(),
            report.duration_ms
        );
        Ok(report)
    }
}

/// Table extraction may shell out to java; keep it off the async workers.
async fn extract_off_runtime(
    extractor: &Arc<dyn TableExtractor>,
    document: PathBuf,
) -> Result<Vec<Table>> {
    let extractor = Arc::clone(extractor);
    tokio::task::spawn_blocking(move || extractor.extract_tables(&document))
        .await
        .map_err(|e| Error::Extraction(format!("Extraction task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::tests::{row, FixedGeocoder};
    use axum::routing::get;
    use axum::Router;
    use parking_lot::Mutex;
    use policelog_core::{Coordinates, Error, ListingConfig};
    use policelog_geo::NoopGeocoder;
    use policelog_store::SqliteStore;
    use std::path::{Path, PathBuf};

    const FRAGMENT: &str =
        "/files/assets/public/v/2/police-department/public-information-portal/police-report-log/";

    fn tables() -> Vec<Table> {
        vec![
            vec![row(&["Palo Alto Police Department", "", ""])],
            vec![
                row(&["Case #", "Date", "Time", "Offense", "Location"]),
                row(&[
                    "25-001", "03/01/25", "0800", "Burglary (F)", "", "John Smith",
                    "1990-01-01", "M", "W", "123 Elm",
                ]),
                row(&["25-002", "03/01/25 0930", "Petty Theft 500 Block Main St", "", "Doe, Jane"]),
                row(&["19-777", "03/01/19", "0800", "Old Case", "Main St"]),
            ],
        ]
    }

    fn pipeline<G: Geocoder>(geocoder: G) -> (Pipeline<G, SqliteStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path()).unwrap();
        let store = SqliteStore::open(&paths.db).unwrap();
        let pipeline = Pipeline::new(geocoder, store, CaseNumberFilter::new([24, 25]), paths);
        (pipeline, dir)
    }

    /// Serves fixed tables for any document and records what it was asked for.
    struct FakeExtractor {
        seen: Mutex<Vec<PathBuf>>,
        threads: Mutex<Vec<std::thread::ThreadId>>,
    }

    impl TableExtractor for FakeExtractor {
        fn extract_tables(&self, document: &Path) -> Result<Vec<Table>> {
            self.seen.lock().push(document.to_path_buf());
            self.threads.lock().push(std::thread::current().id());
            if document.metadata()?.len() == 0 {
                return Err(Error::Extraction("empty document".into()));
            }
            Ok(tables())
        }
    }

    #[tokio::test]
    async fn test_ingest_document_once() {
        let (pipeline, _dir) = pipeline(FixedGeocoder(Coordinates::new(37.4, -122.1)));

        let outcome = pipeline.ingest_document("log_a.json", &tables()).await.unwrap();
        let FileOutcome::Processed(report) = outcome else {
            panic!("expected processed outcome");
        };
        assert_eq!(report.rows_seen, 2);
        assert_eq!(report.stored_count(), 2);
        assert!(report.failures.is_empty());

        let store = pipeline.sink();
        let first = store.get_report(report.stored[0]).unwrap().unwrap();
        assert_eq!(first.arrestee_name, "John Smith");
        assert_eq!(first.location, "");
        assert!(first.clone().into_record().coordinates().is_unresolved());

        let second = store.get_report(report.stored[1]).unwrap().unwrap();
        assert_eq!(second.offense, "Petty Theft");
        assert_eq!(second.location, "500 Block Main St");
        assert_eq!(second.latitude, 37.4);
        assert_eq!(second.longitude, -122.1);
        assert_eq!(second.arrestee_name, "Jane Doe");
        assert!(second.incident_datetime.is_some());

        let again = pipeline.ingest_document("log_a.json", &tables()).await.unwrap();
        assert!(matches!(again, FileOutcome::AlreadyProcessed { .. }));
        assert_eq!(store.count_reports().unwrap(), 2);
        assert_eq!(store.count_files().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_run_processes_each_document_once() {
        let good = format!("{}log-0301.pdf", FRAGMENT);
        let empty = format!("{}log-0302.pdf", FRAGMENT);
        let missing = format!("{}log-0303.pdf", FRAGMENT);
        let html = format!(
            r#"<a href="{}">1</a><a href="{}">2</a><a href="{}">3</a>"#,
            good, empty, missing
        );

        let app = Router::new()
            .route("/log", get(move || async move { axum::response::Html(html) }))
            .route(&good, get(|| async { "%PDF-1.4" }))
            .route(&empty, get(|| async { "" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let listing = LogListingClient::new(ListingConfig {
            listing_url: format!("http://{}/log", addr),
            base_url: format!("http://{}", addr),
            ..Default::default()
        })
        .unwrap();
        let downloader = DocumentDownloader::new().unwrap();
        let fake = Arc::new(FakeExtractor {
            seen: Mutex::new(Vec::new()),
            threads: Mutex::new(Vec::new()),
        });
        let extractor: Arc<dyn TableExtractor> = fake.clone();
        let (pipeline, _dir) = pipeline(NoopGeocoder);

        let report = pipeline.run(&listing, &downloader, &extractor).await.unwrap();
        assert_eq!(report.outcomes.len(), 3);
        assert!(matches!(report.outcomes[0], FileOutcome::Processed(_)));
        assert!(matches!(
            report.outcomes[1],
            FileOutcome::Failed { file_id: Some(2), .. }
        ));
        assert!(matches!(
            report.outcomes[2],
            FileOutcome::Failed { file_id: Some(3), .. }
        ));
        assert_eq!(report.stored_total(), 2);
        assert!(report.has_failures());
        assert!(fake.seen.lock()[0].ends_with("downloads/log_1.pdf"));
        // Extraction ran on the blocking pool, not the runtime thread.
        let runtime_thread = std::thread::current().id();
        assert!(fake.threads.lock().iter().all(|t| *t != runtime_thread));

        // Every discovered document now has a file id, including failures.
        let second = pipeline.run(&listing, &downloader, &extractor).await.unwrap();
        assert_eq!(second.skipped_files(), 3);
        assert_eq!(second.stored_total(), 0);
        assert_eq!(fake.seen.lock().len(), 2);
        assert_eq!(pipeline.sink().count_reports().unwrap(), 2);
    }
}
