//! Police Log Sources: where raw tables come from.
//!
//! Discovers log documents on the department's listing page, downloads
//! them into `data/downloads/`, and turns them into tables of string cells
//! via tabula-java (either its JSON output on disk or the CLI itself).

pub mod download;
pub mod listing;
pub mod tables;

pub use download::DocumentDownloader;
pub use listing::{extract_log_links, LogListingClient};
pub use tables::{parse_tabula_json, TableExtractor, TabulaCliExtractor, TabulaJsonExtractor};
