//! Typed access to the drive API on top of a fetch capability.

use std::sync::Arc;

use tracing::debug;

use drivetally_core::error::{AppError, ErrorKind};
use drivetally_core::result::AppResult;
use drivetally_core::traits::FetchCapability;
use drivetally_core::types::{ItemAddress, Node, Page, Permission};

use crate::paths;
use crate::wire::{DriveItem, ListResponse, PermissionEntry};

/// Fetches single resources and parses them into domain types.
///
/// The client never follows continuation links itself; walking a chain of
/// pages is the lister's job.
#[derive(Debug, Clone)]
pub struct DriveClient {
    fetcher: Arc<dyn FetchCapability>,
}

impl DriveClient {
    /// Create a client over the given fetch capability.
    pub fn new(fetcher: Arc<dyn FetchCapability>) -> Self {
        Self { fetcher }
    }

    /// Name of the underlying provider.
    pub fn provider_type(&self) -> &str {
        self.fetcher.provider_type()
    }

    /// Fetch one page of a listing. `path` is a listing endpoint or a
    /// continuation link from a previous page.
    pub async fn item_page(&self, path: &str) -> AppResult<Page<Node>> {
        let body = self.fetcher.fetch(path).await?;
        let list: ListResponse<DriveItem> = serde_json::from_value(body).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Unparseable listing from {path}: {e}"),
                e,
            )
        })?;
        let page = Page::from(list);
        debug!(
            path,
            items = page.items.len(),
            has_next = page.next.is_some(),
            "Fetched listing page"
        );
        Ok(page)
    }

    /// Fetch the permission list of an item. Only the first page is read.
    pub async fn permissions(&self, address: &ItemAddress) -> AppResult<Vec<Permission>> {
        let path = paths::permissions(address);
        let body = self.fetcher.fetch(&path).await?;
        let list: ListResponse<PermissionEntry> = serde_json::from_value(body)?;
        Ok(list.value.into_iter().map(Permission::from).collect())
    }

    /// Fetch a single item.
    pub async fn item(&self, address: &ItemAddress) -> AppResult<Node> {
        let path = paths::item(address);
        let body = self.fetcher.fetch(&path).await?;
        let item: DriveItem = serde_json::from_value(body)?;
        Ok(Node::from(item))
    }
}
