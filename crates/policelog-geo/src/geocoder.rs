//! Geocoder trait and implementations.
//!
//! The `Geocoder` trait abstracts over location lookup. Implementations:
//! - `GoogleGeocoder`: Google Maps Geocoding API over HTTP
//! - `NoopGeocoder`: always `(0, 0)`; used when no API key is configured
//!
//! Lookups never fail from the caller's point of view: every error path
//! degrades to `Coordinates::default()`.

use std::future::Future;

use policelog_core::Coordinates;

use crate::google::GoogleGeocoder;

/// Trait for geocoding backends.
pub trait Geocoder: Send + Sync {
    /// Resolve a cleaned location string. `(0, 0)` when unresolved.
    fn locate(&self, location: &str) -> impl Future<Output = Coordinates> + Send;

    /// Whether lookups can return anything other than `(0, 0)`.
    fn is_available(&self) -> bool;
}

/// Geocoder that resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGeocoder;

impl Geocoder for NoopGeocoder {
    async fn locate(&self, _location: &str) -> Coordinates {
        Coordinates::default()
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// The geocoder selected at startup.
pub enum GeocoderBackend {
    Google(GoogleGeocoder),
    Noop(NoopGeocoder),
}

impl Geocoder for GeocoderBackend {
    async fn locate(&self, location: &str) -> Coordinates {
        match self {
            Self::Google(g) => g.locate(location).await,
            Self::Noop(n) => n.locate(location).await,
        }
    }

    fn is_available(&self) -> bool {
        match self {
            Self::Google(g) => g.is_available(),
            Self::Noop(n) => n.is_available(),
        }
    }
}
