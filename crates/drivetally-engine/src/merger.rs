//! Owned and shared-with-me root listings, merged.

use tracing::{debug, instrument};

use drivetally_core::result::AppResult;
use drivetally_core::types::{Node, Provenance};
use drivetally_graph::paths;

use crate::lister::PaginatedLister;

/// Produces the root set from the two root listings.
#[derive(Debug, Clone)]
pub struct RootMerger {
    lister: PaginatedLister,
}

impl RootMerger {
    /// Create a merger.
    pub fn new(lister: PaginatedLister) -> Self {
        Self { lister }
    }

    /// List owned and shared roots concurrently and concatenate them, owned
    /// first. An item present in both listings appears twice, once per
    /// provenance. A failure of either listing fails the merge.
    #[instrument(skip_all)]
    pub async fn merge_roots(&self) -> AppResult<Vec<Node>> {
        let (owned, shared) = tokio::try_join!(
            self.lister.list_path(paths::OWNED_ROOT_CHILDREN),
            self.lister.list_path(paths::SHARED_WITH_ME),
        )?;
        debug!(owned = owned.len(), shared = shared.len(), "Root listings fetched");

        let mut roots = Vec::with_capacity(owned.len() + shared.len());
        roots.extend(
            owned
                .into_iter()
                .map(|n| n.with_provenance(Provenance::Owned)),
        );
        roots.extend(
            shared
                .into_iter()
                .map(|n| n.with_provenance(Provenance::Shared)),
        );
        Ok(roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use drivetally_core::config::engine::EngineConfig;
    use drivetally_core::error::{AppError, ErrorKind};
    use drivetally_graph::{DriveClient, MemoryFetcher, fixtures};
    use tokio_util::sync::CancellationToken;

    use crate::context::EngineContext;

    fn merger(fetcher: &MemoryFetcher) -> RootMerger {
        let client = DriveClient::new(Arc::new(fetcher.clone()));
        let ctx = EngineContext::new(client, EngineConfig::default(), CancellationToken::new());
        RootMerger::new(PaginatedLister::new(ctx))
    }

    #[tokio::test]
    async fn test_tags_provenance_and_keeps_duplicates() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing(
            paths::OWNED_ROOT_CHILDREN,
            vec![fixtures::folder("X", "Same"), fixtures::file("f", "notes.txt", 3)],
            1,
        );
        fetcher.insert_listing(
            paths::SHARED_WITH_ME,
            vec![fixtures::folder("X", "Same")],
            0,
        );

        let roots = merger(&fetcher).merge_roots().await.unwrap();
        assert_eq!(roots.len(), 3);
        assert_eq!(roots[0].provenance, Some(Provenance::Owned));
        assert_eq!(roots[1].provenance, Some(Provenance::Owned));
        assert_eq!(roots[2].provenance, Some(Provenance::Shared));
        assert_eq!(roots[0].id, roots[2].id);
    }

    #[tokio::test]
    async fn test_empty_listings() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing(paths::OWNED_ROOT_CHILDREN, Vec::new(), 0);
        fetcher.insert_listing(paths::SHARED_WITH_ME, Vec::new(), 0);

        let roots = merger(&fetcher).merge_roots().await.unwrap();
        assert!(roots.is_empty());
    }

    #[tokio::test]
    async fn test_failed_listing_fails_merge() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing(paths::OWNED_ROOT_CHILDREN, vec![fixtures::file("f", "f", 1)], 0);
        fetcher.fail(paths::SHARED_WITH_ME, AppError::upstream("503 Service Unavailable"));

        let err = merger(&fetcher).merge_roots().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upstream);
    }
}
