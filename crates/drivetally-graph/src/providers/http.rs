//! HTTP fetch provider for the drive API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, RETRY_AFTER};
use serde_json::Value;
use tracing::{debug, warn};

use drivetally_core::config::graph::GraphConfig;
use drivetally_core::error::{AppError, ErrorKind};
use drivetally_core::result::AppResult;
use drivetally_core::traits::{AccessTokenProvider, FetchCapability};

/// Upstream error bodies are truncated to this many characters in messages.
const MAX_ERROR_BODY: usize = 300;

/// Authenticated `GET` over HTTPS with retry on throttling.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn AccessTokenProvider>,
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl HttpFetcher {
    /// Build a fetcher from configuration and a token source.
    pub fn new(config: &GraphConfig, tokens: Arc<dyn AccessTokenProvider>) -> AppResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("drivetally/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_secs(config.max_retry_delay_seconds),
        })
    }

    /// Absolute continuation links are used verbatim; anything else is
    /// joined onto the API root.
    fn resolve(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// Delay before the next attempt: `Retry-After` seconds when the
    /// upstream sends them, exponential backoff otherwise, never above the cap.
    fn retry_delay(&self, retry_after: Option<&HeaderValue>, attempt: u32) -> Duration {
        let hinted = retry_after
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let backoff = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        hinted.unwrap_or(backoff).min(self.max_delay)
    }

    async fn send_once(&self, url: &str) -> AppResult<reqwest::Response> {
        let token = self.tokens.access_token().await?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        Ok(response)
    }
}

/// Map a non-success status to an error kind.
fn status_error(status: StatusCode, url: &str, body: &str) -> AppError {
    let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
    let message = format!("GET {url} returned {status}: {snippet}");
    match status {
        StatusCode::UNAUTHORIZED => AppError::authentication(message),
        StatusCode::FORBIDDEN => AppError::authorization(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
            AppError::rate_limit(message)
        }
        _ => AppError::upstream(message),
    }
}

fn is_throttled(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

#[async_trait]
impl FetchCapability for HttpFetcher {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn fetch(&self, path: &str) -> AppResult<Value> {
        let url = self.resolve(path);
        let mut attempt = 0;

        loop {
            let response = match self.send_once(&url).await {
                Ok(response) => response,
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.retry_delay(None, attempt);
                    warn!(url, attempt, delay_ms = delay.as_millis() as u64, error = %e, "Request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let status = response.status();
            if status.is_success() {
                debug!(url, %status, "GET");
                return Ok(response.json::<Value>().await?);
            }

            if is_throttled(status) && attempt < self.max_retries {
                let delay = self.retry_delay(response.headers().get(RETRY_AFTER), attempt);
                warn!(
                    url,
                    %status,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Throttled by upstream, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(url, %status, error = %e, "Failed to read error body");
                    String::new()
                }
            };
            return Err(status_error(status, &url, &body));
        }
    }
}
