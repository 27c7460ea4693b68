//! HTTP client with rate limiting and retry logic for the TV NOW API
//!
//! Provides a rate-limited HTTP client that sends a browser-like header set
//! and implements exponential backoff for transient errors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Result, TvnowError};

const DEFAULT_API_URL: &str = "https://api.tvnow.de/v3";
const DEFAULT_BASE_URL: &str = "https://www.tvnow.de";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
const ACCEPT_LANGUAGE: &str = "de-DE,de;q=0.8,en-US;q=0.5,en;q=0.3";
const ACCEPT_JSON: &str = "application/json, text/plain, */*";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Maximum retry attempts for transient errors (default: 3)
    pub max_retries: u32,
    /// JSON API root (default: "https://api.tvnow.de/v3")
    pub api_url: String,
    /// Public website root, used for the Referer header (default: "https://www.tvnow.de")
    pub base_url: String,
    /// Catalog items requested per page (default: 500)
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 2.0,
            timeout_secs: 30,
            max_retries: 3,
            api_url: DEFAULT_API_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 500,
        }
    }
}

/// Rate limiter to control request frequency
///
/// Ensures requests are spaced at least `min_interval` apart.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        let now = Instant::now();
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(now.checked_sub(min_interval).unwrap_or(now))),
        }
    }

    /// Acquire permission to make a request
    ///
    /// If called before the minimum interval has passed since the last request,
    /// this method will sleep until the interval has elapsed.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Baseline header set sent with every request
///
/// Mirrors what a desktop Firefox sends so the API treats us like its own
/// web frontend.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    headers
}

/// Extra headers for the catalog listing endpoint
///
/// # Errors
/// Returns `InvalidConfig` if `base_url` cannot be used as a header value
pub fn catalog_headers(base_url: &str) -> Result<HeaderMap> {
    let referer = format!("{}/az", base_url.trim_end_matches('/'));
    let referer = HeaderValue::from_str(&referer)
        .map_err(|_| TvnowError::InvalidConfig(format!("unusable base URL: {}", base_url)))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    headers.insert(header::REFERER, referer);
    Ok(headers)
}

/// HTTP client wrapper with rate limiting and retry logic
///
/// Handles all HTTP communication with the TV NOW API, including:
/// - Rate limiting to avoid overwhelming the server
/// - Automatic retries with exponential backoff for transient errors
/// - Baseline browser headers (User-Agent, Accept-Language)
pub struct TvnowClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
    max_retries: u32,
}

impl TvnowClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        if config.requests_per_second.is_nan() || config.requests_per_second <= 0.0 {
            return Err(TvnowError::InvalidConfig(format!(
                "requests_per_second must be positive, got {}",
                config.requests_per_second
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(browser_headers())
            .build()
            .map_err(TvnowError::HttpError)?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.requests_per_second),
            max_retries: config.max_retries,
        })
    }

    /// Fetch a URL and return the response body as text
    ///
    /// The body is decoded using the charset the server declares,
    /// falling back to UTF-8.
    ///
    /// # Arguments
    /// * `url` - Absolute URL to fetch
    /// * `headers` - Extra headers merged over the baseline set
    ///
    /// # Errors
    /// - `HttpError` - Network errors, timeouts or non-success status
    /// - `NotFound` - Server returned 404
    /// - `RateLimited` - Server returned 429 after all retries exhausted
    pub async fn fetch(&self, url: &str, headers: Option<&HeaderMap>) -> Result<String> {
        let mut attempt = 0;

        loop {
            self.rate_limiter.acquire().await;

            match self.do_fetch(url, headers).await {
                Ok(body) => return Ok(body),
                Err(e) if Self::is_retryable(&e) && attempt < self.max_retries => {
                    let backoff = Self::backoff(attempt);
                    warn!(url, attempt, error = %e, "transient fetch failure, retrying");
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Perform a single fetch attempt
    async fn do_fetch(&self, url: &str, headers: Option<&HeaderMap>) -> Result<String> {
        debug!(url, "GET");

        let mut request = self.client.get(url);
        if let Some(headers) = headers {
            request = request.headers(headers.clone());
        }

        let response = request.send().await.map_err(TvnowError::HttpError)?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TvnowError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TvnowError::NotFound(url.to_string()));
        }

        let response = response.error_for_status().map_err(TvnowError::HttpError)?;
        response.text().await.map_err(TvnowError::HttpError)
    }

    /// Exponential backoff: 1s, 2s, 4s, ... saturating for large attempts
    fn backoff(attempt: u32) -> Duration {
        Duration::from_secs(1u64.checked_shl(attempt).unwrap_or(u64::MAX))
    }

    /// Check if an error is retryable
    fn is_retryable(error: &TvnowError) -> bool {
        match error {
            TvnowError::RateLimited => true,
            TvnowError::HttpError(e) => {
                // Retry on timeout, connection errors, or 5xx status codes
                e.is_timeout()
                    || e.is_connect()
                    || e.status().map(|s| s.is_server_error()).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Get a reference to the rate limiter (for testing)
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}
