//! Google Maps Geocoding API client.

use std::time::Duration;

use policelog_core::{Coordinates, Error, GeocoderConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::LocationCache;
use crate::geocoder::Geocoder;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Append the locality suffix to a cleaned location.
pub fn build_query_address(location: &str, locality_suffix: &str) -> String {
    format!("{} {}", location.trim(), locality_suffix.trim())
        .trim()
        .to_string()
}

/// First result's coordinates; `None` for an empty result set.
pub fn parse_geocode_response(body: &str) -> Result<Option<Coordinates>> {
    let response: GeocodeResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .first()
        .map(|r| Coordinates::new(r.geometry.location.lat, r.geometry.location.lng)))
}

/// Geocoder backed by the Google Maps Geocoding API.
///
/// The API key is supplied at construction; the process environment is
/// never consulted here.
pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
    locality_suffix: String,
    cache: LocationCache,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("geocoder API key is not set".into()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            locality_suffix: config.locality_suffix.clone(),
            cache: LocationCache::default_cache(),
        })
    }

    /// One lookup with errors surfaced. A timeout is reported as an error.
    pub async fn lookup(&self, location: &str) -> Result<Option<Coordinates>> {
        let address = build_query_address(location, &self.locality_suffix);
        debug!("Geocoding {:?}", address);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::Http(format!("Geocode request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocode(format!("API error {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("Geocode read failed: {}", e)))?;
        parse_geocode_response(&body)
    }

    pub fn cached_locations(&self) -> usize {
        self.cache.len()
    }
}

impl Geocoder for GoogleGeocoder {
    async fn locate(&self, location: &str) -> Coordinates {
        let location = location.trim();
        if location.is_empty() {
            return Coordinates::default();
        }
        if let Some(coords) = self.cache.get(location) {
            return coords;
        }

        match self.lookup(location).await {
            Ok(Some(coords)) => {
                self.cache.put(location.to_string(), coords);
                coords
            }
            Ok(None) => {
                debug!("No geocode results for {:?}", location);
                Coordinates::default()
            }
            Err(e) => {
                warn!("Error getting coordinates for {:?}: {}", location, e);
                Coordinates::default()
            }
        }
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;

    fn config(endpoint: String) -> GeocoderConfig {
        GeocoderConfig {
            api_key: Some("test-key".into()),
            endpoint,
            timeout_secs: 2,
            ..Default::default()
        }
    }

    async fn fake_geocode(Query(params): Query<HashMap<String, String>>) -> String {
        let address = params.get("address").cloned().unwrap_or_default();
        if params.get("key").map(String::as_str) != Some("test-key") {
            return r#"{"results": [], "status": "REQUEST_DENIED"}"#.into();
        }
        if address.starts_with("Nowhere") {
            return r#"{"results": [], "status": "ZERO_RESULTS"}"#.into();
        }
        assert!(address.ends_with("Palo Alto, CA"));
        r#"{"results": [{"geometry": {"location": {"lat": 37.4449, "lng": -122.1611}}}], "status": "OK"}"#.into()
    }

    async fn slow_geocode() -> String {
        tokio::time::sleep(Duration::from_secs(3)).await;
        r#"{"results": [{"geometry": {"location": {"lat": 1.0, "lng": 1.0}}}], "status": "OK"}"#.into()
    }

    async fn spawn_fake_api() -> String {
        let app = Router::new()
            .route("/geocode/json", get(fake_geocode))
            .route("/broken/json", get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
            .route("/slow/json", get(slow_geocode));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_build_query_address() {
        assert_eq!(
            build_query_address("500 Block University Ave", "Palo Alto, CA"),
            "500 Block University Ave Palo Alto, CA"
        );
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"results": [{"geometry": {"location": {"lat": 1.5, "lng": -2.5}}}]}"#;
        assert_eq!(
            parse_geocode_response(body).unwrap(),
            Some(Coordinates::new(1.5, -2.5))
        );
        assert_eq!(parse_geocode_response(r#"{"results": []}"#).unwrap(), None);
        assert_eq!(parse_geocode_response(r#"{"status": "ZERO_RESULTS"}"#).unwrap(), None);
        assert!(parse_geocode_response("<html>").is_err());
    }

    #[test]
    fn test_requires_api_key() {
        let mut cfg = config("http://localhost".into());
        cfg.api_key = None;
        assert!(GoogleGeocoder::new(&cfg).is_err());
        cfg.api_key = Some(String::new());
        assert!(GoogleGeocoder::new(&cfg).is_err());
    }

    #[tokio::test]
    async fn test_locate_against_fake_api() {
        let base = spawn_fake_api().await;
        let geocoder = GoogleGeocoder::new(&config(format!("{}/geocode/json", base))).unwrap();

        let coords = geocoder.locate("500 Block University Ave").await;
        assert_eq!(coords, Coordinates::new(37.4449, -122.1611));
        assert_eq!(geocoder.cached_locations(), 1);

        assert!(geocoder.locate("Nowhere Special").await.is_unresolved());
        assert!(geocoder.locate("").await.is_unresolved());
        assert_eq!(geocoder.cached_locations(), 1);
    }

    #[tokio::test]
    async fn test_failures_degrade_to_origin() {
        let base = spawn_fake_api().await;

        let broken = GoogleGeocoder::new(&config(format!("{}/broken/json", base))).unwrap();
        assert!(broken.lookup("Main St").await.is_err());
        assert!(broken.locate("Main St").await.is_unresolved());

        let unreachable = GoogleGeocoder::new(&config("http://127.0.0.1:9/geocode/json".into())).unwrap();
        assert!(unreachable.locate("Main St").await.is_unresolved());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let base = spawn_fake_api().await;
        let mut cfg = config(format!("{}/slow/json", base));
        cfg.timeout_secs = 1;
        let slow = GoogleGeocoder::new(&cfg).unwrap();

        let started = std::time::Instant::now();
        assert!(slow.lookup("Main St").await.is_err());
        assert!(started.elapsed() < Duration::from_secs(3));

        assert!(slow.locate("Main St").await.is_unresolved());
        assert_eq!(slow.cached_locations(), 0);
    }
}
