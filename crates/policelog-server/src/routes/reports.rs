//! Arrest report routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::error;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/reports", get(list_reports))
}

/// GET /api/reports: every stored report, in insertion order.
async fn list_reports(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.list_reports() {
        Ok(reports) => (
            StatusCode::OK,
            Json(serde_json::json!({ "data": reports })),
        ),
        Err(e) => {
            error!("Error fetching reports: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Internal Server Error" })),
            )
        }
    }
}
