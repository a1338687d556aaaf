//! Enriched roots handed to the presentation layer.

use serde::{Deserialize, Serialize};

use super::node::Node;
use super::notice::{Notice, NoticeKind};
use super::permission::Permission;

/// A root node with its aggregate size, permissions, and any notices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedNode {
    /// The root as listed.
    #[serde(flatten)]
    pub node: Node,
    /// Sum of every file reachable below (or the file's own size).
    pub aggregated_size: u64,
    /// Grants on the root.
    pub permissions: Vec<Permission>,
    /// Advisories and degradations raised while enriching.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

impl EnrichedNode {
    /// Whether part of the subtree could not be counted.
    pub fn is_partial(&self) -> bool {
        self.notices.iter().any(Notice::understates_size)
    }

    /// Whether the permission list is empty because fetching it failed.
    pub fn permissions_degraded(&self) -> bool {
        self.notices
            .iter()
            .any(|n| matches!(n.kind, NoticeKind::PermissionsUnavailable { .. }))
    }

    /// Whether any folder in the subtree raised the large-listing advisory.
    pub fn has_accuracy_notice(&self) -> bool {
        self.notices.iter().any(Notice::is_large_listing)
    }
}

/// The result of one full run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRoots {
    /// Roots in presentation order.
    pub nodes: Vec<EnrichedNode>,
    /// Sum of all root aggregates.
    pub total_size: u64,
    /// Number of notices across all roots.
    pub notice_count: usize,
}

impl EnrichedRoots {
    /// Build the report from already ordered nodes.
    pub fn new(nodes: Vec<EnrichedNode>) -> Self {
        let total_size = nodes.iter().map(|n| n.aggregated_size).sum();
        let notice_count = nodes.iter().map(|n| n.notices.len()).sum();
        Self {
            nodes,
            total_size,
            notice_count,
        }
    }

    /// All notices, in root order.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.nodes.iter().flat_map(|n| n.notices.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(size: u64, notices: Vec<Notice>) -> EnrichedNode {
        EnrichedNode {
            node: Node::folder("id", "name"),
            aggregated_size: size,
            permissions: Vec::new(),
            notices,
        }
    }

    #[test]
    fn test_report_totals() {
        let report = EnrichedRoots::new(vec![
            enriched(10, vec![]),
            enriched(5, vec![Notice::new("x", NoticeKind::CycleDetected)]),
        ]);
        assert_eq!(report.total_size, 15);
        assert_eq!(report.notice_count, 1);
        assert_eq!(report.notices().count(), 1);
    }

    #[test]
    fn test_flags() {
        let node = enriched(
            0,
            vec![Notice::new(
                "id",
                NoticeKind::PermissionsUnavailable {
                    message: "boom".into(),
                },
            )],
        );
        assert!(node.permissions_degraded());
        assert!(!node.is_partial());
        assert!(!node.has_accuracy_notice());
    }
}
