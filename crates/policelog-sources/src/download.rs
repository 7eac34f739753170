//! Source document download.

use std::path::Path;
use std::time::Duration;

use policelog_core::{Error, Result};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Streams remote documents to local files.
pub struct DocumentDownloader {
    client: Client,
}

impl DocumentDownloader {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Download `url` into `dest`, chunk by chunk. Returns bytes written.
    ///
    /// A partially written file is removed on failure.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Error downloading {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Http(format!(
                "Error downloading {}: status {}",
                url,
                response.status()
            )));
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;

        let result: Result<()> = async {
            while let Some(chunk) = response
                .chunk()
                .await
                .map_err(|e| Error::Http(format!("Error downloading {}: {}", url, e)))?
            {
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = result {
            drop(file);
            let _ = tokio::fs::remove_file(dest).await;
            return Err(e);
        }

        debug!("Wrote {} bytes to {}", written, dest.display());
        info!("Downloaded {}", url);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/log.pdf", get(|| async { "%PDF-1.4 fake body" }))
            .route(
                "/missing.pdf",
                get(|| async { (axum::http::StatusCode::NOT_FOUND, "nope") }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let base = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("downloads").join("log_1.pdf");

        let downloader = DocumentDownloader::new().unwrap();
        let written = downloader
            .download(&format!("{}/log.pdf", base), &dest)
            .await
            .unwrap();

        assert_eq!(written, 18);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "%PDF-1.4 fake body");
    }

    #[tokio::test]
    async fn test_download_failure_leaves_no_file() {
        let base = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("log_2.pdf");

        let downloader = DocumentDownloader::new().unwrap();
        let err = downloader
            .download(&format!("{}/missing.pdf", base), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http(_)));
        assert!(!dest.exists());
    }
}
