//! Listing page discovery.

use std::collections::HashSet;
use std::time::Duration;

use once_cell::sync::Lazy;
use policelog_core::{Error, ListingConfig, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Absolute URLs of every log document linked from `html`.
///
/// A link qualifies when its lowercased target mentions `pdf` and contains
/// the configured path fragment. Relative targets get `base_url` prepended.
/// Document order is kept; repeats are dropped. Attribute values come from
/// the parsed document, so entities are decoded and commented-out markup is
/// ignored.
pub fn extract_log_links(html: &str, listing: &ListingConfig) -> Vec<String> {
    let fragment = listing.link_fragment.to_lowercase();
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();

    document
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href").map(str::trim))
        .filter(|href| {
            let lower = href.to_lowercase();
            lower.contains("pdf") && lower.contains(&fragment)
        })
        .map(|href| {
            if href.starts_with("http") {
                href.to_string()
            } else {
                format!("{}{}", listing.base_url, href)
            }
        })
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Fetches the listing page and extracts document links from it.
pub struct LogListingClient {
    client: Client,
    listing: ListingConfig,
}

impl LogListingClient {
    pub fn new(listing: ListingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, listing })
    }

    pub fn listing(&self) -> &ListingConfig {
        &self.listing
    }

    /// Document URLs currently linked from the listing page.
    ///
    /// A non-success status is logged and yields no documents.
    pub async fn discover(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.listing.listing_url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Listing request failed: {}", e)))?;

        if !response.status().is_success() {
            warn!(
                "Failed to retrieve listing page {}, status code: {}",
                self.listing.listing_url,
                response.status().as_u16()
            );
            return Ok(Vec::new());
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("Listing read failed: {}", e)))?;
        let links = extract_log_links(&html, &self.listing);
        info!("Found {} log documents on listing page", links.len());
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;

    const FRAGMENT: &str =
        "/files/assets/public/v/2/police-department/public-information-portal/police-report-log/";

    fn listing(url: &str) -> ListingConfig {
        ListingConfig {
            listing_url: url.to_string(),
            base_url: "https://www.cityofpaloalto.org".into(),
            ..Default::default()
        }
    }

    fn page() -> String {
        format!(
            r#"<html><body>
            <a href="{f}log-2025-03-01.pdf">March 1</a>
            <a class="doc" href='https://www.cityofpaloalto.org{f}log-2025-03-02.PDF'>March 2</a>
            <a href="{f}log-2025-03-01.pdf">March 1 again</a>
            <a href="/files/assets/other/budget.pdf">Budget</a>
            <a href="{f}index.html">Index</a>
            <link href="{f}style.pdf.css">
            </body></html>"#,
            f = FRAGMENT
        )
    }

    #[test]
    fn test_extract_log_links() {
        let links = extract_log_links(&page(), &listing("http://unused"));
        assert_eq!(
            links,
            vec![
                format!("https://www.cityofpaloalto.org{}log-2025-03-01.pdf", FRAGMENT),
                format!("https://www.cityofpaloalto.org{}log-2025-03-02.PDF", FRAGMENT),
            ]
        );
    }

    #[test]
    fn test_extract_reads_parsed_attributes() {
        let html = format!(
            r#"<ul>
            <!-- <a href="{f}old-draft.pdf">draft</a> -->
            <li><a href="{f}log.pdf?v=2&amp;t=1">Current</a></li>
            <li><a href={f}unquoted.pdf>Unquoted</a></li>
            </ul>"#,
            f = FRAGMENT
        );
        let links = extract_log_links(&html, &listing("http://unused"));
        assert_eq!(
            links,
            vec![
                format!("https://www.cityofpaloalto.org{}log.pdf?v=2&t=1", FRAGMENT),
                format!("https://www.cityofpaloalto.org{}unquoted.pdf", FRAGMENT),
            ]
        );
    }

    #[test]
    fn test_extract_no_links() {
        assert!(extract_log_links("<p>nothing here</p>", &listing("http://unused")).is_empty());
    }

    #[tokio::test]
    async fn test_discover_against_local_page() {
        let html = page();
        let app = Router::new()
            .route("/log", get(move || async move { axum::response::Html(html) }))
            .route(
                "/missing",
                get(|| async { (axum::http::StatusCode::NOT_FOUND, "gone") }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = LogListingClient::new(listing(&format!("http://{}/log", addr))).unwrap();
        assert_eq!(client.discover().await.unwrap().len(), 2);

        let client = LogListingClient::new(listing(&format!("http://{}/missing", addr))).unwrap();
        assert!(client.discover().await.unwrap().is_empty());
    }
}
