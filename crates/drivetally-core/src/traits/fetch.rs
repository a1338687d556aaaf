//! Authenticated fetch capability consumed by the engine.

use async_trait::async_trait;

use crate::result::AppResult;

/// An authenticated `GET` against the upstream storage API.
///
/// `path` is either relative to the API root (`/me/drive/root/children`) or
/// an absolute continuation URL handed back by a previous response; both are
/// fetched verbatim. Implementations own credentials and retry policy, the
/// engine never sees either.
///
/// Implementations exist for HTTP (reqwest) and in-memory fixtures in
/// `drivetally-graph`.
#[async_trait]
pub trait FetchCapability: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "http", "memory").
    fn provider_type(&self) -> &str;

    /// Fetch one resource and return its JSON body.
    async fn fetch(&self, path: &str) -> AppResult<serde_json::Value>;
}
