//! In-memory fetch provider backed by JSON fixtures.
//!
//! Serves canned response bodies keyed by request path, with optional
//! per-path failures and artificial latency. Request counts and the peak
//! number of concurrent requests are recorded so callers can assert on
//! traffic shape.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Value, json};
use tracing::trace;

use drivetally_core::error::{AppError, ErrorKind};
use drivetally_core::result::AppResult;
use drivetally_core::traits::FetchCapability;

/// In-memory fetch provider.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    /// Path → response body.
    responses: Arc<DashMap<String, Value>>,
    /// Path → error returned instead of the body.
    failures: Arc<DashMap<String, AppError>>,
    /// Path → number of times it was requested.
    requests: Arc<DashMap<String, usize>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    /// Delay applied to every request.
    latency: Duration,
}

/// Decrements the in-flight counter even when the request future is dropped.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MemoryFetcher {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a JSON file holding an object of `path → body`.
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to read fixture file {}", path.display()),
                e,
            )
        })?;
        let fixtures: serde_json::Map<String, Value> = serde_json::from_str(&raw)?;

        let fetcher = Self::new();
        for (request_path, body) in fixtures {
            fetcher.insert(request_path, body);
        }
        Ok(fetcher)
    }

    /// Delay every request by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Serve `body` for `path`.
    pub fn insert(&self, path: impl Into<String>, body: Value) {
        self.responses.insert(path.into(), body);
    }

    /// Serve `items` as a listing at `path`, split into pages of
    /// `page_size` items chained by continuation links. A `page_size` of
    /// zero serves a single page.
    pub fn insert_listing(&self, path: &str, items: Vec<Value>, page_size: usize) {
        let chunk = if page_size == 0 {
            items.len().max(1)
        } else {
            page_size
        };
        let batches: Vec<Vec<Value>> = if items.is_empty() {
            vec![Vec::new()]
        } else {
            items.chunks(chunk).map(<[Value]>::to_vec).collect()
        };

        let count = batches.len();
        for (index, batch) in batches.into_iter().enumerate() {
            let key = page_path(path, index);
            let body = if index + 1 < count {
                json!({"value": batch, "@odata.nextLink": page_path(path, index + 1)})
            } else {
                json!({"value": batch})
            };
            self.insert(key, body);
        }
    }

    /// Return `err` for every request to `path`.
    pub fn fail(&self, path: impl Into<String>, err: AppError) {
        self.failures.insert(path.into(), err);
    }

    /// Fail the `index`-th page (0-based) of a listing created by
    /// [`insert_listing`](Self::insert_listing).
    pub fn fail_page(&self, path: &str, index: usize, err: AppError) {
        self.fail(page_path(path, index), err);
    }

    /// Number of requests made for `path`.
    pub fn requests(&self, path: &str) -> usize {
        self.requests.get(path).map(|n| *n).unwrap_or(0)
    }

    /// Number of requests made in total.
    pub fn total_requests(&self) -> usize {
        self.requests.iter().map(|entry| *entry.value()).sum()
    }

    /// Highest number of requests that were in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

/// Request path of the `index`-th page of a listing.
pub fn page_path(path: &str, index: usize) -> String {
    if index == 0 {
        path.to_string()
    } else {
        format!("{path}?$skiptoken={index}")
    }
}

#[async_trait]
impl FetchCapability for MemoryFetcher {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, path: &str) -> AppResult<Value> {
        *self.requests.entry(path.to_string()).or_insert(0) += 1;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlightGuard(&self.in_flight);
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        trace!(path, "Serving fixture");

        if let Some(err) = self.failures.get(path) {
            return Err(err.value().clone());
        }
        self.responses
            .get(path)
            .map(|body| body.value().clone())
            .ok_or_else(|| AppError::not_found(format!("No fixture for {path}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_and_counts() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert("/a", json!({"value": []}));

        assert!(fetcher.fetch("/a").await.is_ok());
        assert!(fetcher.fetch("/a").await.is_ok());
        assert_eq!(fetcher.requests("/a"), 2);
        assert_eq!(fetcher.total_requests(), 2);
        assert_eq!(fetcher.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_missing_fixture_is_not_found() {
        let fetcher = MemoryFetcher::new();
        let err = fetcher.fetch("/nope").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_failure_overrides_body() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert("/a", json!({}));
        fetcher.fail("/a", AppError::upstream("500"));
        let err = fetcher.fetch("/a").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upstream);
    }

    #[tokio::test]
    async fn test_insert_listing_chains_pages() {
        let fetcher = MemoryFetcher::new();
        let items = (0..5).map(|i| json!({"id": i.to_string()})).collect();
        fetcher.insert_listing("/list", items, 2);

        let first = fetcher.fetch("/list").await.unwrap();
        assert_eq!(first["value"].as_array().unwrap().len(), 2);
        assert_eq!(first["@odata.nextLink"], "/list?$skiptoken=1");

        let last = fetcher.fetch("/list?$skiptoken=2").await.unwrap();
        assert_eq!(last["value"].as_array().unwrap().len(), 1);
        assert!(last.get("@odata.nextLink").is_none());
    }

    #[tokio::test]
    async fn test_empty_listing_is_one_empty_page() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing("/empty", Vec::new(), 10);
        let body = fetcher.fetch("/empty").await.unwrap();
        assert_eq!(body["value"].as_array().unwrap().len(), 0);
    }
}
