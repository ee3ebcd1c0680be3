//! HTTP client for fetching the results page
//!
//! Bounded timeout, retry with exponential backoff on network errors and
//! retryable statuses, and a body always decoded as UTF-8.

use crate::infrastructure::config::SourceConfig;
use crate::infrastructure::harvest_error::{HarvestError, HarvestResult};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Attempts per request, the first one included
    pub max_retries: u32,
    pub user_agent: String,
}

impl HttpClientConfig {
    pub fn from_source_config(source: &SourceConfig) -> Self {
        Self {
            timeout_seconds: source.timeout_seconds,
            max_retries: source.max_retries,
            user_agent: source.user_agent.clone(),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_source_config(&SourceConfig::default())
    }
}

/// Delay before the next attempt; `Retry-After` can only lengthen it
fn backoff_delay(attempt: u32, retry_after: Option<u64>) -> Duration {
    let base = 2_u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_secs(retry_after.map_or(base, |secs| secs.max(base)))
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn with_config(config: HttpClientConfig) -> HarvestResult<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HarvestError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Fetch a page body as UTF-8 text, retrying transient failures
    pub async fn fetch_text(&self, url: &str) -> HarvestResult<String> {
        let attempts = self.config.max_retries.max(1);
        let mut attempt = 1;

        loop {
            info!("🌐 HTTP GET (attempt {}/{}): {}", attempt, attempts, url);

            let (error, retry_after) = match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    let bytes = response.bytes().await.map_err(|source| HarvestError::Fetch {
                        url: url.to_string(),
                        source,
                    })?;
                    debug!("Fetched {} bytes from {}", bytes.len(), url);
                    return Ok(String::from_utf8_lossy(&bytes).into_owned());
                }
                Ok(response) => {
                    let status = response.status();
                    let retry_after = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok());
                    let error = HarvestError::HttpStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    };
                    if !is_retryable_status(status) {
                        return Err(error);
                    }
                    (error, retry_after)
                }
                Err(source) => (
                    HarvestError::Fetch {
                        url: url.to_string(),
                        source,
                    },
                    None,
                ),
            };

            if attempt >= attempts || !error.is_retryable() {
                return Err(error);
            }

            let delay = backoff_delay(attempt, retry_after);
            warn!("⚠️ Attempt {} failed for {}: {} (retrying in {:?})", attempt, url, error, delay);
            sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Where the raw results document comes from
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_document(&self) -> HarvestResult<String>;

    /// Human-readable origin for logs
    fn describe(&self) -> String;
}

/// The live results page
pub struct HttpDocumentSource {
    client: HttpClient,
    url: String,
}

impl HttpDocumentSource {
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch_document(&self) -> HarvestResult<String> {
        self.client.fetch_text(&self.url).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// A saved copy of the results page
pub struct FileDocumentSource {
    path: PathBuf,
}

impl FileDocumentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    async fn fetch_document(&self) -> HarvestResult<String> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| HarvestError::io(&self.path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
        assert_eq!(client.config().timeout_seconds, 15);
        assert_eq!(client.config().max_retries, 3);
    }

    #[test]
    fn test_backoff_grows_and_honours_retry_after() {
        assert_eq!(backoff_delay(1, None), Duration::from_secs(1));
        assert_eq!(backoff_delay(3, None), Duration::from_secs(4));
        assert_eq!(backoff_delay(1, Some(10)), Duration::from_secs(10));
        assert_eq!(backoff_delay(3, Some(1)), Duration::from_secs(4));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_file_source_reads_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<html>特別獎</html>").unwrap();

        let source = FileDocumentSource::new(&path);
        assert_eq!(source.fetch_document().await.unwrap(), "<html>特別獎</html>");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let source = FileDocumentSource::new("/nonexistent/page.html");
        assert!(matches!(
            source.fetch_document().await,
            Err(HarvestError::Io { .. })
        ));
    }
}
