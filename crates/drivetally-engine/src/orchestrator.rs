//! Per-root enrichment and final ordering.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};

use drivetally_core::error::AppError;
use drivetally_core::result::AppResult;
use drivetally_core::types::{EnrichedNode, Node, sort_for_presentation};

use crate::aggregator::SizeAggregator;
use crate::context::EngineContext;
use crate::permissions::PermissionFetcher;

/// Attaches aggregate size and permissions to every root.
///
/// Roots are enriched concurrently up to `engine.root_concurrency`; the
/// size walk and the permission lookup of one root also run concurrently.
#[derive(Debug, Clone)]
pub struct EnrichmentOrchestrator {
    ctx: EngineContext,
    aggregator: SizeAggregator,
    permissions: PermissionFetcher,
}

impl EnrichmentOrchestrator {
    /// Create an orchestrator.
    pub fn new(
        ctx: EngineContext,
        aggregator: SizeAggregator,
        permissions: PermissionFetcher,
    ) -> Self {
        Self {
            ctx,
            aggregator,
            permissions,
        }
    }

    /// Enrich every root and return them in presentation order.
    ///
    /// The output holds exactly one entry per input root. Only fatal
    /// errors fail the call; everything else surfaces as notices.
    #[instrument(skip_all, fields(roots = roots.len()))]
    pub async fn enrich(&self, roots: Vec<Node>) -> AppResult<Vec<EnrichedNode>> {
        let concurrency = self.ctx.config.root_concurrency.max(1);
        info!(concurrency, "Enriching roots");

        let mut enriched: Vec<EnrichedNode> = stream::iter(roots)
            .map(|root| self.enrich_one(root))
            .buffer_unordered(concurrency)
            .try_collect()
            .await?;

        sort_for_presentation(&mut enriched);
        Ok(enriched)
    }

    async fn enrich_one(&self, node: Node) -> AppResult<EnrichedNode> {
        let (size, access) = tokio::join!(
            self.aggregator.total_size(&node),
            self.permissions.list_permissions(&node),
        );
        let size = size?;

        // A cancelled permission lookup degrades instead of failing, so
        // check again before handing out a result.
        if self.ctx.is_cancelled() {
            return Err(AppError::cancelled("Run cancelled"));
        }

        let mut notices = size.notices;
        notices.extend(access.notice);
        debug!(
            node_id = %node.id,
            aggregated_size = size.total,
            permissions = access.permissions.len(),
            notices = notices.len(),
            "Root enriched"
        );

        Ok(EnrichedNode {
            node,
            aggregated_size: size.total,
            permissions: access.permissions,
            notices,
        })
    }
}
