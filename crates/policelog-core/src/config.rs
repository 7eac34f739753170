//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3004;
pub const DEFAULT_LISTING_URL: &str =
    "https://www.cityofpaloalto.org/Departments/Police/Public-Information-Portal/Police-Report-Log";
pub const DEFAULT_BASE_URL: &str = "https://www.cityofpaloalto.org";
pub const DEFAULT_LINK_FRAGMENT: &str =
    "files/assets/public/v/2/police-department/public-information-portal/police-report-log/";
pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_LOCALITY_SUFFIX: &str = "Palo Alto, CA";

/// Paths to all data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// SQLite database directory (`data/db/`).
    pub db: PathBuf,
    /// Downloaded source documents (`data/downloads/`).
    pub downloads: PathBuf,
    /// Optional configuration file (`data/config.json`).
    pub config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            db: root.join("db"),
            downloads: root.join("downloads"),
            config_file: root.join("config.json"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.db)?;
        std::fs::create_dir_all(&self.downloads)?;
        Ok(())
    }

    /// Local file name for a downloaded source document.
    pub fn download_path(&self, file_id: i64) -> PathBuf {
        self.downloads.join(format!("log_{}.pdf", file_id))
    }
}

/// Where to discover source documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_listing_url")]
    pub listing_url: String,
    /// Prefix for relative links found on the listing page.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path fragment a link must contain to count as a log document.
    #[serde(default = "default_link_fragment")]
    pub link_fragment: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            listing_url: default_listing_url(),
            base_url: default_base_url(),
            link_fragment: default_link_fragment(),
        }
    }
}

/// Settings for the geocoding collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_geocode_endpoint")]
    pub endpoint: String,
    /// Appended to every location before lookup.
    #[serde(default = "default_locality_suffix")]
    pub locality_suffix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_geocode_endpoint(),
            locality_suffix: default_locality_suffix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings read from `config.json`. Every field has a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FileSettings {
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    listing: ListingConfig,
    #[serde(default)]
    geocoder: GeocoderConfig,
    #[serde(default)]
    case_years: Option<Vec<u8>>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoliceLogConfig {
    /// HTTP server port.
    pub port: u16,
    pub data_paths: DataPaths,
    pub listing: ListingConfig,
    pub geocoder: GeocoderConfig,
    /// Two-digit case-number year prefixes currently in use.
    pub case_years: Vec<u8>,
}

impl PoliceLogConfig {
    /// Load `config.json` from the data directory, then fill gaps from the
    /// process environment.
    pub fn load(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let data_paths = DataPaths::new(data_dir)?;
        let mut config = Self::from_file(data_paths);
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Build configuration from `config.json` alone. A missing or invalid
    /// file yields defaults.
    pub fn from_file(data_paths: DataPaths) -> Self {
        let settings: FileSettings = match std::fs::read_to_string(&data_paths.config_file) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!(
                    "Ignoring invalid config file {}: {}",
                    data_paths.config_file.display(),
                    e
                );
                FileSettings::default()
            }),
            Err(_) => FileSettings::default(),
        };

        Self {
            port: settings.port.unwrap_or(DEFAULT_PORT),
            data_paths,
            listing: settings.listing,
            geocoder: settings.geocoder,
            case_years: settings.case_years.unwrap_or_else(default_case_years),
        }
    }

    /// Environment fallbacks: `PORT`, `GOOGLE_MAPS_API_KEY`,
    /// `POLICELOG_LISTING_URL`. The API key from the file wins.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if self.geocoder.api_key.is_none() {
            self.geocoder.api_key = lookup("GOOGLE_MAPS_API_KEY").filter(|k| !k.is_empty());
        }
        if let Some(url) = lookup("POLICELOG_LISTING_URL") {
            info!("Listing URL overridden from environment");
            self.listing.listing_url = url;
        }
    }
}

fn default_listing_url() -> String {
    DEFAULT_LISTING_URL.into()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_link_fragment() -> String {
    DEFAULT_LINK_FRAGMENT.into()
}
fn default_geocode_endpoint() -> String {
    DEFAULT_GEOCODE_ENDPOINT.into()
}
fn default_locality_suffix() -> String {
    DEFAULT_LOCALITY_SUFFIX.into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_case_years() -> Vec<u8> {
    vec![24, 25]
}
