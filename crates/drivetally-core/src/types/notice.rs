//! Advisories and degradations attached to enriched roots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What happened at a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoticeKind {
    /// The folder has more direct children than the configured threshold.
    /// The aggregate is still complete but less trustworthy.
    LargeListing {
        /// Number of direct children listed.
        child_count: usize,
    },
    /// Listing the subtree failed; it contributed zero bytes.
    SubtreeFailed {
        /// The error that was contained.
        message: String,
    },
    /// The folder is already an ancestor on the current path; it contributed zero bytes.
    CycleDetected,
    /// Descent stopped at the depth guard; the folder contributed zero bytes.
    DepthLimitReached {
        /// Depth at which descent stopped.
        depth: usize,
    },
    /// Permissions could not be fetched; the list is empty.
    PermissionsUnavailable {
        /// The error that was swallowed.
        message: String,
    },
}

/// An advisory keyed to the node it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Identifier of the affected node.
    pub node_id: String,
    /// What happened.
    #[serde(flatten)]
    pub kind: NoticeKind,
}

impl Notice {
    /// Create a notice for a node.
    pub fn new(node_id: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            node_id: node_id.into(),
            kind,
        }
    }

    /// Whether the notice means an aggregate may be understated.
    pub fn understates_size(&self) -> bool {
        matches!(
            self.kind,
            NoticeKind::SubtreeFailed { .. }
                | NoticeKind::CycleDetected
                | NoticeKind::DepthLimitReached { .. }
        )
    }

    /// Whether the notice is the large-listing accuracy advisory.
    pub fn is_large_listing(&self) -> bool {
        matches!(self.kind, NoticeKind::LargeListing { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NoticeKind::LargeListing { child_count } => write!(
                f,
                "{}: {child_count} direct children, total may be inaccurate",
                self.node_id
            ),
            NoticeKind::SubtreeFailed { message } => {
                write!(f, "{}: subtree skipped ({message})", self.node_id)
            }
            NoticeKind::CycleDetected => {
                write!(f, "{}: reference cycle, subtree skipped", self.node_id)
            }
            NoticeKind::DepthLimitReached { depth } => {
                write!(f, "{}: depth limit {depth} reached", self.node_id)
            }
            NoticeKind::PermissionsUnavailable { message } => {
                write!(f, "{}: permissions unavailable ({message})", self.node_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_flat_with_kind_tag() {
        let notice = Notice::new("n1", NoticeKind::LargeListing { child_count: 201 });
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"node_id": "n1", "kind": "large_listing", "child_count": 201})
        );
    }

    #[test]
    fn test_understates_size() {
        assert!(Notice::new("a", NoticeKind::CycleDetected).understates_size());
        assert!(!Notice::new("a", NoticeKind::LargeListing { child_count: 1 }).understates_size());
        assert!(
            !Notice::new(
                "a",
                NoticeKind::PermissionsUnavailable {
                    message: "x".into()
                }
            )
            .understates_size()
        );
    }
}
