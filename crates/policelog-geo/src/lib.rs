//! Police Log Geo: location text to coordinates.
//!
//! Provides the `Geocoder` trait. With an API key configured,
//! `GoogleGeocoder` queries the Google Maps Geocoding API; without one,
//! `NoopGeocoder` is used and every record keeps `(0, 0)`.

pub mod cache;
pub mod geocoder;
pub mod google;

pub use cache::LocationCache;
pub use geocoder::{Geocoder, GeocoderBackend, NoopGeocoder};
pub use google::GoogleGeocoder;

use policelog_core::GeocoderConfig;

/// Create the best available geocoder for the given configuration.
pub fn create_geocoder(config: &GeocoderConfig) -> GeocoderBackend {
    match GoogleGeocoder::new(config) {
        Ok(geocoder) => {
            tracing::info!("Using Google geocoder ({})", config.endpoint);
            GeocoderBackend::Google(geocoder)
        }
        Err(e) => {
            tracing::warn!("Geocoder unavailable: {}. Locations will not be resolved.", e);
            GeocoderBackend::Noop(NoopGeocoder)
        }
    }
}
