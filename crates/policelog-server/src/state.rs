//! Shared application state.

use policelog_core::PoliceLogConfig;
use policelog_store::SqliteStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: PoliceLogConfig,
    pub store: SqliteStore,
}

impl AppState {
    pub fn new(config: PoliceLogConfig, store: SqliteStore) -> Self {
        Self { config, store }
    }
}
