//! Recursive size aggregation.
//!
//! Each folder returns its own [`SizeReport`]; parents combine the reports
//! of their children. Nothing is accumulated in shared state.

use futures::future::{BoxFuture, try_join_all};
use tracing::{instrument, warn};

use drivetally_core::result::AppResult;
use drivetally_core::types::{Node, Notice, NoticeKind};

use crate::lister::PaginatedLister;

/// Aggregate byte count of a subtree plus the notices raised inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeReport {
    /// Sum of every file size counted.
    pub total: u64,
    /// Advisories and degradations, parents before children.
    pub notices: Vec<Notice>,
}

impl SizeReport {
    /// A report for a single file.
    pub fn leaf(size: u64) -> Self {
        Self {
            total: size,
            notices: Vec::new(),
        }
    }

    /// A zero-byte report for a subtree that was not counted.
    pub fn skipped(notice: Notice) -> Self {
        Self {
            total: 0,
            notices: vec![notice],
        }
    }

    /// Fold a child report into this one.
    pub fn absorb(&mut self, child: SizeReport) {
        self.total = self.total.saturating_add(child.total);
        self.notices.extend(child.notices);
    }

    /// Whether any part of the subtree was left uncounted.
    pub fn is_partial(&self) -> bool {
        self.notices.iter().any(Notice::understates_size)
    }
}

/// Sums file sizes below a node.
///
/// A failure while listing one folder costs only that folder's
/// contribution. Fatal errors (see [`AppError::is_fatal`]) abort the whole
/// walk.
///
/// [`AppError::is_fatal`]: drivetally_core::error::AppError::is_fatal
#[derive(Debug, Clone)]
pub struct SizeAggregator {
    lister: PaginatedLister,
    large_listing_threshold: usize,
    max_depth: usize,
}

impl SizeAggregator {
    /// Create an aggregator.
    pub fn new(lister: PaginatedLister, large_listing_threshold: usize, max_depth: usize) -> Self {
        Self {
            lister,
            large_listing_threshold,
            max_depth,
        }
    }

    /// Aggregate size of `node`: its own size for a file, the sum of every
    /// reachable file for a folder.
    #[instrument(skip_all, fields(node_id = %node.id))]
    pub async fn total_size(&self, node: &Node) -> AppResult<SizeReport> {
        if !node.is_folder {
            return Ok(SizeReport::leaf(node.size));
        }
        self.folder_size(node, &[], 0).await
    }

    /// Size of one folder. `ancestors` holds the traversal keys on the
    /// path from the root down to, but excluding, `folder`.
    fn folder_size<'a>(
        &'a self,
        folder: &'a Node,
        ancestors: &'a [String],
        depth: usize,
    ) -> BoxFuture<'a, AppResult<SizeReport>> {
        Box::pin(async move {
            let key = folder.traversal_key();
            if ancestors.contains(&key) {
                warn!(node_id = %folder.id, key = %key, "Reference cycle detected, skipping subtree");
                return Ok(SizeReport::skipped(Notice::new(
                    folder.id.clone(),
                    NoticeKind::CycleDetected,
                )));
            }
            if depth >= self.max_depth {
                warn!(node_id = %folder.id, depth, "Depth limit reached, skipping subtree");
                return Ok(SizeReport::skipped(Notice::new(
                    folder.id.clone(),
                    NoticeKind::DepthLimitReached { depth },
                )));
            }

            let children = match self.lister.list_children(folder).await {
                Ok(children) => children,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(node_id = %folder.id, error = %e, "Subtree listing failed, counting it as zero");
                    return Ok(SizeReport::skipped(Notice::new(
                        folder.id.clone(),
                        NoticeKind::SubtreeFailed {
                            message: e.to_string(),
                        },
                    )));
                }
            };

            let mut report = SizeReport::default();
            if children.len() > self.large_listing_threshold {
                warn!(
                    node_id = %folder.id,
                    child_count = children.len(),
                    threshold = self.large_listing_threshold,
                    "Large listing, total may be inaccurate"
                );
                report.notices.push(Notice::new(
                    folder.id.clone(),
                    NoticeKind::LargeListing {
                        child_count: children.len(),
                    },
                ));
            }

            let mut path = ancestors.to_vec();
            path.push(key);

            for file in children.iter().filter(|c| !c.is_folder) {
                report.total = report.total.saturating_add(file.size);
            }

            let subfolders = children
                .iter()
                .filter(|c| c.is_folder)
                .map(|child| self.folder_size(child, &path, depth + 1));
            for child in try_join_all(subfolders).await? {
                report.absorb(child);
            }

            Ok(report)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use drivetally_core::config::engine::EngineConfig;
    use drivetally_core::error::{AppError, ErrorKind};
    use drivetally_graph::{DriveClient, MemoryFetcher, fixtures};
    use serde_json::Value;
    use tokio_util::sync::CancellationToken;

    use crate::context::EngineContext;

    fn aggregator(fetcher: &MemoryFetcher, threshold: usize, max_depth: usize) -> SizeAggregator {
        let client = DriveClient::new(Arc::new(fetcher.clone()));
        let ctx = EngineContext::new(client, EngineConfig::default(), CancellationToken::new());
        SizeAggregator::new(PaginatedLister::new(ctx), threshold, max_depth)
    }

    fn children(id: &str) -> String {
        format!("/me/drive/items/{id}/children")
    }

    /// root: A (10, 20), B (5, C (3))
    fn sample_tree() -> MemoryFetcher {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing(
            &children("root"),
            vec![fixtures::folder("A", "A"), fixtures::folder("B", "B")],
            0,
        );
        fetcher.insert_listing(
            &children("A"),
            vec![fixtures::file("a1", "a1", 10), fixtures::file("a2", "a2", 20)],
            0,
        );
        fetcher.insert_listing(
            &children("B"),
            vec![fixtures::file("b1", "b1", 5), fixtures::folder("C", "C")],
            0,
        );
        fetcher.insert_listing(&children("C"), vec![fixtures::file("c1", "c1", 3)], 0);
        fetcher
    }

    #[tokio::test]
    async fn test_sums_nested_tree() {
        let fetcher = sample_tree();
        let agg = aggregator(&fetcher, 200, 64);

        let root = agg.total_size(&Node::folder("root", "root")).await.unwrap();
        let a = agg.total_size(&Node::folder("A", "A")).await.unwrap();
        let b = agg.total_size(&Node::folder("B", "B")).await.unwrap();

        assert_eq!(root.total, 38);
        assert_eq!(a.total, 30);
        assert_eq!(b.total, 8);
        assert!(root.notices.is_empty());
    }

    #[tokio::test]
    async fn test_file_is_its_own_size() {
        let fetcher = MemoryFetcher::new();
        let report = aggregator(&fetcher, 200, 64)
            .total_size(&Node::file("f", "f", 42))
            .await
            .unwrap();
        assert_eq!(report.total, 42);
        assert_eq!(fetcher.total_requests(), 0);
    }

    #[tokio::test]
    async fn test_large_listing_threshold() {
        let files = |n: usize| -> Vec<Value> {
            (0..n)
                .map(|i| fixtures::file(&format!("f{i}"), "f", 1))
                .collect()
        };
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing(&children("big"), files(201), 50);
        fetcher.insert_listing(&children("edge"), files(200), 50);
        let agg = aggregator(&fetcher, 200, 64);

        let big = agg.total_size(&Node::folder("big", "big")).await.unwrap();
        assert_eq!(big.total, 201);
        assert_eq!(
            big.notices,
            vec![Notice::new("big", NoticeKind::LargeListing { child_count: 201 })]
        );
        assert!(!big.is_partial());

        let edge = agg.total_size(&Node::folder("edge", "edge")).await.unwrap();
        assert_eq!(edge.total, 200);
        assert!(edge.notices.is_empty());
    }

    #[tokio::test]
    async fn test_failed_subtree_contributes_zero() {
        let fetcher = sample_tree();
        fetcher.fail(children("C"), AppError::upstream("500 Internal Server Error"));

        let report = aggregator(&fetcher, 200, 64)
            .total_size(&Node::folder("root", "root"))
            .await
            .unwrap();
        assert_eq!(report.total, 35);
        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.notices[0].node_id, "C");
        assert!(report.is_partial());
    }

    #[tokio::test]
    async fn test_fatal_error_aborts_walk() {
        let fetcher = sample_tree();
        fetcher.fail(children("C"), AppError::authentication("401 Unauthorized"));

        let err = aggregator(&fetcher, 200, 64)
            .total_size(&Node::folder("root", "root"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_cycle_is_cut() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing(
            &children("top"),
            vec![fixtures::file("t1", "t1", 7), fixtures::folder("loop", "loop")],
            0,
        );
        // "loop" contains a reference back to "top".
        fetcher.insert_listing(
            &children("loop"),
            vec![fixtures::file("l1", "l1", 1), fixtures::folder("top", "top again")],
            0,
        );

        let report = aggregator(&fetcher, 200, 64)
            .total_size(&Node::folder("top", "top"))
            .await
            .unwrap();
        assert_eq!(report.total, 8);
        assert_eq!(
            report.notices,
            vec![Notice::new("top", NoticeKind::CycleDetected)]
        );
        assert_eq!(fetcher.requests(&children("top")), 1);
    }

    #[tokio::test]
    async fn test_same_folder_in_sibling_branches_is_not_a_cycle() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing(
            &children("top"),
            vec![fixtures::folder("x", "x"), fixtures::folder("y", "y")],
            0,
        );
        fetcher.insert_listing(&children("x"), vec![fixtures::folder("s", "s")], 0);
        fetcher.insert_listing(&children("y"), vec![fixtures::folder("s", "s")], 0);
        fetcher.insert_listing(&children("s"), vec![fixtures::file("s1", "s1", 4)], 0);

        let report = aggregator(&fetcher, 200, 64)
            .total_size(&Node::folder("top", "top"))
            .await
            .unwrap();
        assert_eq!(report.total, 8);
        assert!(report.notices.is_empty());
    }

    #[tokio::test]
    async fn test_depth_limit_stops_descent() {
        let fetcher = sample_tree();

        let report = aggregator(&fetcher, 200, 2)
            .total_size(&Node::folder("root", "root"))
            .await
            .unwrap();
        // C sits at depth 2 and is not listed.
        assert_eq!(report.total, 35);
        assert_eq!(
            report.notices,
            vec![Notice::new("C", NoticeKind::DepthLimitReached { depth: 2 })]
        );
        assert_eq!(fetcher.requests(&children("C")), 0);
    }

    #[tokio::test]
    async fn test_remote_folder_is_walked_in_its_drive() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_listing(
            "/drives/d2/items/R/children",
            vec![fixtures::file("r1", "r1", 11), fixtures::folder("R2", "inner")],
            0,
        );
        fetcher.insert_listing(
            "/drives/d2/items/R2/children",
            vec![fixtures::file("r2", "r2", 4)],
            0,
        );
        let shared = Node::folder("ref", "Shared").with_remote("d2", "R");

        let report = aggregator(&fetcher, 200, 64)
            .total_size(&shared)
            .await
            .unwrap();
        assert_eq!(report.total, 15);
    }
}
