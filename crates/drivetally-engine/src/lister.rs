//! Paginated listing of one folder level.

use std::collections::HashSet;

use futures::stream::{self, Stream, TryStreamExt};
use tracing::{debug, instrument};

use drivetally_core::error::AppError;
use drivetally_core::result::AppResult;
use drivetally_core::types::{Node, Page};
use drivetally_graph::paths;

use crate::context::EngineContext;

/// Follows continuation links until a listing is exhausted.
///
/// Every call starts from the first page; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct PaginatedLister {
    ctx: EngineContext,
}

impl PaginatedLister {
    /// Create a lister for one run.
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Lazily fetch the pages of the listing that starts at `first`.
    ///
    /// The stream ends after the first page without a continuation link, or
    /// after the first error. A continuation link that was already visited
    /// is reported as an upstream error rather than followed again.
    pub fn pages(&self, first: String) -> impl Stream<Item = AppResult<Page<Node>>> + '_ {
        let state = (Some(first), HashSet::new());
        stream::try_unfold(state, move |(next, mut seen)| async move {
            let Some(path) = next else {
                return Ok(None);
            };
            if !seen.insert(path.clone()) {
                return Err(AppError::upstream(format!(
                    "Continuation link repeats an earlier page: {path}"
                )));
            }
            let page = self.ctx.guarded(self.ctx.client.item_page(&path)).await?;
            let following = page.next.clone();
            Ok(Some((page, (following, seen))))
        })
    }

    /// Fetch every page of the listing at `first` and concatenate them in
    /// upstream order. Any page failure fails the whole listing.
    #[instrument(skip(self))]
    pub async fn list_path(&self, first: &str) -> AppResult<Vec<Node>> {
        let mut pages = std::pin::pin!(self.pages(first.to_string()));
        let mut nodes = Vec::new();
        let mut page_count = 0usize;

        while let Some(page) = pages.try_next().await? {
            page_count += 1;
            nodes.extend(page.items);
        }

        debug!(pages = page_count, items = nodes.len(), "Listing complete");
        Ok(nodes)
    }

    /// List the direct children of `parent`.
    ///
    /// Children of an item in another drive inherit that drive when the
    /// upstream omits it, so they can be listed in turn.
    pub async fn list_children(&self, parent: &Node) -> AppResult<Vec<Node>> {
        let address = parent.address();
        let mut children = self.list_path(&paths::children(&address)).await?;

        if let Some(drive) = &address.drive_id {
            for child in children.iter_mut().filter(|c| c.drive_id.is_none()) {
                child.drive_id = Some(drive.clone());
            }
        }
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use drivetally_core::config::engine::EngineConfig;
    use drivetally_core::error::ErrorKind;
    use drivetally_graph::{DriveClient, MemoryFetcher, fixtures};
    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;

    fn lister(fetcher: &MemoryFetcher) -> PaginatedLister {
        let client = DriveClient::new(Arc::new(fetcher.clone()));
        PaginatedLister::new(EngineContext::new(
            client,
            EngineConfig::default(),
            CancellationToken::new(),
        ))
    }

    fn items(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| fixtures::file(&format!("f{i}"), &format!("file{i}"), i as u64))
            .collect()
    }

    fn ids(nodes: &[Node]) -> Vec<String> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_page_boundaries_do_not_change_result() {
        let one_page = MemoryFetcher::new();
        one_page.insert_listing("/list", items(7), 0);
        let single = MemoryFetcher::new();
        single.insert_listing("/list", items(7), 1);
        let uneven = MemoryFetcher::new();
        uneven.insert_listing("/list", items(7), 3);

        let a = lister(&one_page).list_path("/list").await.unwrap();
        let b = lister(&single).list_path("/list").await.unwrap();
        let c = lister(&uneven).list_path("/list").await.unwrap();

        assert_eq!(a.len(), 7);
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(ids(&a), ids(&c));
        assert_eq!(single.total_requests(), 7);
    }

    #[tokio::test]
    async fn test_failed_page_fails_whole_listing() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing("/list", items(6), 2);
        fetcher.fail_page("/list", 1, AppError::upstream("502 Bad Gateway"));

        let err = lister(&fetcher).list_path("/list").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upstream);
        // The page after the failing one is never requested.
        assert_eq!(fetcher.requests("/list?$skiptoken=2"), 0);
    }

    #[tokio::test]
    async fn test_each_call_refetches() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing("/list", items(2), 0);
        let lister = lister(&fetcher);

        lister.list_path("/list").await.unwrap();
        lister.list_path("/list").await.unwrap();
        assert_eq!(fetcher.requests("/list"), 2);
    }

    #[tokio::test]
    async fn test_repeating_continuation_link_is_an_error() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert(
            "/loop",
            json!({"value": [fixtures::file("a", "a", 1)], "@odata.nextLink": "/loop"}),
        );

        let err = lister(&fetcher).list_path("/loop").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upstream);
        assert_eq!(fetcher.requests("/loop"), 1);
    }

    #[tokio::test]
    async fn test_children_inherit_foreign_drive() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing(
            "/drives/other/items/R1/children",
            vec![fixtures::folder("c1", "inner")],
            0,
        );
        let parent = Node::folder("ref", "Shared").with_remote("other", "R1");

        let children = lister(&fetcher).list_children(&parent).await.unwrap();
        assert_eq!(children[0].drive_id.as_deref(), Some("other"));
        assert_eq!(children[0].traversal_key(), "other!c1");
        assert!(children[0].provenance.is_none());
    }
}
