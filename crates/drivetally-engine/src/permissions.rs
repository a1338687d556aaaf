//! Best-effort permission lookup.

use tracing::{instrument, warn};

use drivetally_core::types::{Node, Notice, NoticeKind, Permission};

use crate::context::EngineContext;

/// Permissions of one item, plus a notice if they could not be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionOutcome {
    /// The grants; empty when the lookup failed.
    pub permissions: Vec<Permission>,
    /// Set when the lookup failed and the list was degraded to empty.
    pub notice: Option<Notice>,
}

/// Fetches the single-page permission list of an item.
///
/// Failures never propagate: a missing permission list is cosmetic, while a
/// failed size walk would corrupt totals, so only the latter is an error.
#[derive(Debug, Clone)]
pub struct PermissionFetcher {
    ctx: EngineContext,
}

impl PermissionFetcher {
    /// Create a fetcher for one run.
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Fetch the permissions of `node`, degrading to an empty list on failure.
    #[instrument(skip_all, fields(node_id = %node.id))]
    pub async fn list_permissions(&self, node: &Node) -> PermissionOutcome {
        let address = node.address();
        match self
            .ctx
            .guarded(self.ctx.client.permissions(&address))
            .await
        {
            Ok(permissions) => PermissionOutcome {
                permissions,
                notice: None,
            },
            Err(e) => {
                warn!(error = %e, "Permission lookup failed, continuing without permissions");
                PermissionOutcome {
                    permissions: Vec::new(),
                    notice: Some(Notice::new(
                        node.id.clone(),
                        NoticeKind::PermissionsUnavailable {
                            message: e.to_string(),
                        },
                    )),
                }
            }
        }
    }
}
