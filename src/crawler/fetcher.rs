//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the traversal, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - Retry with exponential backoff for transient (network-level) failures
//! - Content-Type sniffing and transparent gunzip of sitemap payloads
//!
//! HTTP error statuses are deterministic and are returned to the caller
//! untouched; only timeouts and connection-level failures are retried.

use crate::config::{Config, FetchConfig};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use reqwest::{header::CONTENT_TYPE, Client};
use std::future::Future;
use std::io::Read;
use std::time::Duration;
use thiserror::Error;

/// Leading bytes of every gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors raised by the fetch layer
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("failed to decompress gzip payload: {0}")]
    Decompress(String),
}

impl FetchError {
    /// Returns true for failures worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_) | Self::Body(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value (empty when absent)
    pub content_type: String,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true when the server labelled the payload as HTML
    pub fn is_html(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("text/html")
    }

    /// Returns true when the Content-Type carries a gzip marker
    pub fn is_gzip_content_type(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("gzip")
    }

    /// Returns the body as text, gunzipping it first when it is compressed
    ///
    /// A gzip Content-Type whose body lacks the gzip magic bytes was already
    /// decoded in transit and is returned as-is. Conversely, a payload that
    /// starts with the magic bytes is decompressed whatever its label says
    /// (servers commonly send `.xml.gz` files as `application/octet-stream`).
    pub fn text(&self) -> Result<String, FetchError> {
        if self.body.starts_with(&GZIP_MAGIC) {
            if !self.is_gzip_content_type() {
                tracing::debug!(
                    "{} is gzip-compressed but labelled '{}'",
                    self.url,
                    self.content_type
                );
            }
            return gunzip(&self.body);
        }

        Ok(String::from_utf8_lossy(&self.body).into_owned())
    }
}

/// Decompresses a gzip payload into UTF-8 text
pub fn gunzip(bytes: &[u8]) -> Result<String, FetchError> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| FetchError::Decompress(e.to_string()))?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// The fetch capability the traversal depends on
///
/// Implementations own connection pooling, auth headers and caching; the
/// traversal only needs a GET that returns a fully read response.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches `url` with a GET request
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Retry schedule for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Multiplier applied to the delay after each retry
    pub factor: u32,
}

impl RetryPolicy {
    /// Delay to wait before retry number `attempt` (zero-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(self.factor.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.backoff_base_ms),
            factor: config.backoff_factor,
        }
    }
}

/// Runs `operation` until it succeeds, fails permanently, or retries run out
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Timeout | Retry after backoff |
/// | Connection failure | Retry after backoff |
/// | Body read failure | Retry after backoff |
/// | Decompression failure | Immediate failure |
/// | Retries exhausted | Last error returned |
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                tracing::debug!(
                    "Fetch of {} failed ({}), retry {}/{} in {:?}",
                    url,
                    e,
                    attempt,
                    policy.max_retries,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The full configuration (user agent and timeout are used)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.fetch.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`Fetch`] implementation with retry/backoff
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self::new(client, RetryPolicy::from(&config.fetch)))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn get_once(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.bytes().await?.to_vec();

        Ok(FetchResponse {
            url: final_url,
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        tracing::debug!("GET {}", url);
        retry_with_backoff(&self.policy, url, || self.get_once(url)).await
    }
}
