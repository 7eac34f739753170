//! Police Log: arrest-log ingestion and report server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use policelog_core::{DataPaths, PoliceLogConfig};
use policelog_geo::{create_geocoder, GeocoderBackend};
use policelog_normalize::CaseNumberFilter;
use policelog_runtime::{FileOutcome, Pipeline};
use policelog_sources::{
    parse_tabula_json, DocumentDownloader, LogListingClient, TableExtractor, TabulaCliExtractor,
    TabulaJsonExtractor,
};
use policelog_store::SqliteStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

const TABULA_JAR_FILE: &str = "tabula.jar";

fn resolve_data_dir() -> PathBuf {
    std::env::var("POLICELOG_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn open_store(config: &PoliceLogConfig) -> anyhow::Result<SqliteStore> {
    SqliteStore::open(&config.data_paths.db)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))
}

fn build_pipeline(config: &PoliceLogConfig) -> anyhow::Result<Pipeline<GeocoderBackend, SqliteStore>> {
    let store = open_store(config)?;
    let geocoder = create_geocoder(&config.geocoder);
    Ok(Pipeline::new(
        geocoder,
        store,
        CaseNumberFilter::new(config.case_years.clone()),
        config.data_paths.clone(),
    ))
}

/// tabula-java when a jar is available (`TABULA_JAR` or `data/tabula.jar`),
/// otherwise pre-extracted JSON next to each download.
fn select_extractor(paths: &DataPaths) -> Arc<dyn TableExtractor> {
    let jar = std::env::var("TABULA_JAR")
        .map(PathBuf::from)
        .ok()
        .or_else(|| Some(paths.root.join(TABULA_JAR_FILE)).filter(|p| p.exists()));

    match jar {
        Some(jar) => {
            info!("Extracting tables with {}", jar.display());
            Arc::new(TabulaCliExtractor::new(jar))
        }
        None => {
            warn!("No tabula jar found; reading pre-extracted JSON next to each document");
            Arc::new(TabulaJsonExtractor)
        }
    }
}

async fn scrape(config: PoliceLogConfig) -> anyhow::Result<bool> {
    let pipeline = build_pipeline(&config)?;
    let listing = LogListingClient::new(config.listing.clone())?;
    let downloader = DocumentDownloader::new()?;
    let extractor = select_extractor(&config.data_paths);

    let report = pipeline.run(&listing, &downloader, &extractor).await?;
    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Processed(file) => info!(
                "{} -> file {}: {} of {} rows stored",
                file.source,
                file.file_id,
                file.stored_count(),
                file.rows_seen
            ),
            FileOutcome::AlreadyProcessed { source } => info!("{}: already processed", source),
            FileOutcome::Failed { source, error, .. } => warn!("{}: {}", source, error),
        }
    }
    Ok(!report.has_failures())
}

async fn import(config: PoliceLogConfig, tables_path: &Path, source: Option<String>) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(tables_path)?;
    let tables = parse_tabula_json(&json)?;
    let source = source.unwrap_or_else(|| {
        tables_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| tables_path.display().to_string())
    });

    let pipeline = build_pipeline(&config)?;
    match pipeline.ingest_document(&source, &tables).await? {
        FileOutcome::Processed(file) => info!(
            "Imported {} as file {}: {} of {} rows stored, {} skipped",
            file.source,
            file.file_id,
            file.stored_count(),
            file.rows_seen,
            file.failures.len()
        ),
        other => info!("{}: already processed", other.source()),
    }
    Ok(())
}

async fn serve(config: PoliceLogConfig) -> anyhow::Result<()> {
    let port = config.port;
    let store = open_store(&config)?;
    let state = Arc::new(AppState::new(config, store));

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Police log server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn print_help() {
    println!("Police Log: arrest-log ingestion and report server");
    println!();
    println!("Usage: policelog [command]");
    println!();
    println!("Commands:");
    println!("  serve                      Start the server (default)");
    println!("  scrape                     Discover, download and ingest new logs");
    println!("  import <tables.json> [src] Ingest pre-extracted tabula JSON");
    println!("  help                       Show this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("serve");

    if matches!(command, "--help" | "-h" | "help") {
        print_help();
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());
    let config = PoliceLogConfig::load(&data_dir)?;

    match command {
        "serve" => serve(config).await,
        "scrape" => {
            if !scrape(config).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        "import" => {
            let Some(tables_path) = args.get(2) else {
                eprintln!("Usage: policelog import <tables.json> [source-name]");
                std::process::exit(1);
            };
            import(config, Path::new(tables_path), args.get(3).cloned()).await
        }
        _ => {
            eprintln!("Unknown command: {}. Use 'policelog help' for usage.", command);
            std::process::exit(1);
        }
    }
}
