//! Shared state for one engine run.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use drivetally_core::config::engine::EngineConfig;
use drivetally_core::error::AppError;
use drivetally_core::result::AppResult;
use drivetally_graph::DriveClient;

/// Per-run context handed to every component.
///
/// Cloning is cheap; all clones share one request limiter and one
/// cancellation token.
#[derive(Debug, Clone)]
pub struct EngineContext {
    /// Typed upstream access.
    pub client: DriveClient,
    /// Engine settings.
    pub config: EngineConfig,
    /// Caps in-flight upstream requests across the whole run.
    limiter: Arc<Semaphore>,
    /// Cancelled by the caller or when the run deadline passes.
    cancel: CancellationToken,
}

impl EngineContext {
    /// Create a context for one run.
    pub fn new(client: DriveClient, config: EngineConfig, cancel: CancellationToken) -> Self {
        let permits = config.max_concurrent_requests.max(1);
        Self {
            client,
            config,
            limiter: Arc::new(Semaphore::new(permits)),
            cancel,
        }
    }

    /// Whether the run has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run one upstream request under the concurrency limit, aborting it if
    /// the run is cancelled while waiting for a slot or for the response.
    pub async fn guarded<T>(&self, request: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(AppError::cancelled("Run cancelled")),
            permit = self.limiter.acquire() => {
                permit.map_err(|_| AppError::internal("Request limiter closed"))?
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::cancelled("Run cancelled")),
            result = request => result,
        }
    }

    /// Free request slots right now.
    pub fn available_request_slots(&self) -> usize {
        self.limiter.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivetally_core::error::ErrorKind;
    use drivetally_graph::MemoryFetcher;

    fn context(cancel: CancellationToken) -> EngineContext {
        let client = DriveClient::new(Arc::new(MemoryFetcher::new()));
        EngineContext::new(client, EngineConfig::default(), cancel)
    }

    #[tokio::test]
    async fn test_guarded_passes_result_through() {
        let ctx = context(CancellationToken::new());
        let value = ctx.guarded(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(ctx.available_request_slots(), 8);
    }

    #[tokio::test]
    async fn test_guarded_fails_fast_when_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let ctx = context(cancel);

        let err = ctx
            .guarded(std::future::pending::<AppResult<()>>())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }
}
