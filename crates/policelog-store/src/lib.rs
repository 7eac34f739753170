//! Police Log Store: SQLite persistence for arrest reports.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStore;
pub use types::*;
