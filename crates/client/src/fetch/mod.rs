//! HTTP fetch pipeline for the offline worker.
//!
//! The worker fronts a single configured origin, so this client is a thin
//! wrapper over reqwest: timeout, byte cap, bounded redirects, and request
//! timing. Non-success statuses are returned to the caller rather than
//! mapped to errors; the routing policy needs the status to decide whether
//! a response may be stored, and a live non-200 response is still handed
//! back to the requester.

pub mod url;

use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use url::{UrlError, resolve};

use carta_core::Error;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "carta-sw/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "carta-sw/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Response headers
    pub headers: header::HeaderMap,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// HTTP fetch client.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Issue a GET request, returning raw bytes and metadata.
    ///
    /// The Accept header is forwarded from the intercepted request so the
    /// origin sees what the browser asked for. Byte limits are enforced on
    /// both the declared and the actual body length.
    pub async fn get(&self, url: &Url, accept: Option<&str>) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let mut request = self.http.get(url.as_str());
        request = request.header("Accept", accept.unwrap_or("*/*"));

        let response = request
            .send()
            .await
            .map_err(|e| Error::HttpError(format!("network error: {}", e)))?;

        let status = response.status();

        let content_length = response.content_length();
        if let Some(len) = content_length
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                len, self.config.max_bytes
            )));
        }

        let final_url = response.url().clone();
        let headers = response.headers().clone();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} {} in {}ms ({} bytes)",
            url,
            final_url,
            status.as_u16(),
            fetch_ms,
            bytes.len()
        );

        Ok(FetchResponse {
            url: url.clone(),
            final_url,
            status,
            content_type,
            bytes,
            headers,
            fetch_ms,
        })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}
