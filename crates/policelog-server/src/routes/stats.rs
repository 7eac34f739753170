//! Stats routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use policelog_store::StoreStats;
use tracing::warn;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /api/stats: storage statistics.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = state.store.get_stats().unwrap_or_else(|e| {
        warn!("Failed to read store stats: {}", e);
        StoreStats::default()
    });
    let downloads = count_files_in_dir(&state.config.data_paths.downloads);

    Json(serde_json::json!({
        "reports": stats.total_reports,
        "files": stats.total_files,
        "geocodedReports": stats.geocoded_reports,
        "undatedReports": stats.undated_reports,
        "dbSizeMb": stats.db_size_mb,
        "downloads": downloads,
        "geocoderConfigured": state.config.geocoder.api_key.is_some(),
    }))
}

fn count_files_in_dir(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                .count()
        })
        .unwrap_or(0)
}
