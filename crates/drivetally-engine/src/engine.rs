//! The engine facade.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use drivetally_core::config::engine::EngineConfig;
use drivetally_core::error::AppError;
use drivetally_core::result::AppResult;
use drivetally_core::traits::FetchCapability;
use drivetally_core::types::{EnrichedRoots, ItemAddress, Node};
use drivetally_graph::DriveClient;

use crate::aggregator::{SizeAggregator, SizeReport};
use crate::context::EngineContext;
use crate::lister::PaginatedLister;
use crate::merger::RootMerger;
use crate::orchestrator::EnrichmentOrchestrator;
use crate::permissions::PermissionFetcher;

/// Entry point of the aggregation engine.
///
/// Every call fetches fresh data; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct TallyEngine {
    client: DriveClient,
    config: EngineConfig,
}

impl TallyEngine {
    /// Create an engine over a fetch capability.
    pub fn new(fetcher: Arc<dyn FetchCapability>, config: EngineConfig) -> Self {
        Self {
            client: DriveClient::new(fetcher),
            config,
        }
    }

    /// The engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// List owned and shared roots, attach aggregate sizes and permissions,
    /// and return them in presentation order.
    ///
    /// Fails as a whole when a root listing fails, on authentication,
    /// authorization or network errors, when `cancel` fires, or when the
    /// configured deadline passes. A partially populated result is never returned.
    pub async fn fetch_enriched_roots(&self, cancel: CancellationToken) -> AppResult<EnrichedRoots> {
        info!(provider = self.client.provider_type(), "Fetching enriched roots");

        let report = self
            .run(cancel, |ctx| async move {
                let lister = PaginatedLister::new(ctx.clone());
                let roots = RootMerger::new(lister.clone()).merge_roots().await?;
                info!(roots = roots.len(), "Roots merged");

                let orchestrator = EnrichmentOrchestrator::new(
                    ctx.clone(),
                    SizeAggregator::new(
                        lister,
                        ctx.config.large_listing_threshold,
                        ctx.config.max_depth,
                    ),
                    PermissionFetcher::new(ctx),
                );
                let nodes = orchestrator.enrich(roots).await?;
                Ok(EnrichedRoots::new(nodes))
            })
            .await
            .inspect_err(|e| error!(error = %e, "Enrichment failed"))?;

        info!(
            roots = report.nodes.len(),
            total_size = report.total_size,
            notices = report.notice_count,
            "Enrichment complete"
        );
        Ok(report)
    }

    /// Aggregate size of one item in the signed-in user's drive.
    pub async fn total_size_of(
        &self,
        item_id: &str,
        cancel: CancellationToken,
    ) -> AppResult<(Node, SizeReport)> {
        if item_id.trim().is_empty() {
            return Err(AppError::validation("Item id must not be empty"));
        }
        info!(item_id, "Sizing item");

        self.run(cancel, |ctx| async move {
            let node = ctx
                .guarded(ctx.client.item(&ItemAddress {
                    drive_id: None,
                    item_id: item_id.to_string(),
                }))
                .await?;
            let aggregator = SizeAggregator::new(
                PaginatedLister::new(ctx.clone()),
                ctx.config.large_listing_threshold,
                ctx.config.max_depth,
            );
            let report = aggregator.total_size(&node).await?;
            info!(item_id, total = report.total, notices = report.notices.len(), "Item sized");
            Ok((node, report))
        })
        .await
    }

    /// Run `work` under a child of `cancel` and the configured deadline.
    async fn run<T, F, Fut>(&self, cancel: CancellationToken, work: F) -> AppResult<T>
    where
        F: FnOnce(EngineContext) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if cancel.is_cancelled() {
            return Err(AppError::cancelled("Run cancelled before it started"));
        }

        let token = cancel.child_token();
        let ctx = EngineContext::new(self.client.clone(), self.config.clone(), token.clone());
        // Stop any in-flight requests once the run is over, however it ended.
        let _guard = token.drop_guard();

        match self.config.timeout() {
            Some(deadline) => tokio::time::timeout(deadline, work(ctx))
                .await
                .map_err(|_| {
                    AppError::timeout(format!(
                        "Run exceeded the {}s deadline",
                        deadline.as_secs()
                    ))
                })?,
            None => work(ctx).await,
        }
    }
}
