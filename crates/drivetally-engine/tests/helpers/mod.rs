//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use drivetally_core::config::engine::EngineConfig;
use drivetally_engine::TallyEngine;
use drivetally_graph::{MemoryFetcher, fixtures, paths};

/// A fake drive served from memory.
pub struct TestDrive {
    /// The provider behind the engine, for traffic assertions.
    pub fetcher: MemoryFetcher,
    /// Items per listing page; zero serves every listing as one page.
    pub page_size: usize,
}

impl TestDrive {
    /// An empty drive with no roots.
    pub fn new() -> Self {
        Self::with_fetcher(MemoryFetcher::new())
    }

    /// A drive whose every request takes `latency`.
    pub fn slow(latency: Duration) -> Self {
        Self::with_fetcher(MemoryFetcher::new().with_latency(latency))
    }

    fn with_fetcher(fetcher: MemoryFetcher) -> Self {
        let drive = Self {
            fetcher,
            page_size: 0,
        };
        drive.owned(Vec::new());
        drive.shared(Vec::new());
        drive
    }

    /// Serve every listing in pages of `page_size` items.
    pub fn paged(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the owned root listing.
    pub fn owned(&self, items: Vec<Value>) {
        self.fetcher
            .insert_listing(paths::OWNED_ROOT_CHILDREN, items, self.page_size);
    }

    /// Set the shared-with-me root listing.
    pub fn shared(&self, items: Vec<Value>) {
        self.fetcher
            .insert_listing(paths::SHARED_WITH_ME, items, self.page_size);
    }

    /// Set the children of a folder in the signed-in user's drive.
    pub fn children(&self, folder_id: &str, items: Vec<Value>) {
        self.fetcher
            .insert_listing(&own_children(folder_id), items, self.page_size);
    }

    /// Set the children of a folder in another drive.
    pub fn remote_children(&self, drive_id: &str, folder_id: &str, items: Vec<Value>) {
        self.fetcher.insert_listing(
            &format!("/drives/{drive_id}/items/{folder_id}/children"),
            items,
            self.page_size,
        );
    }

    /// Give each own item an empty permission list.
    pub fn no_permissions(&self, item_ids: &[&str]) {
        for id in item_ids {
            self.fetcher.insert(
                format!("/me/drive/items/{id}/permissions"),
                fixtures::permission_list(Vec::new()),
            );
        }
    }

    /// Set the permissions of an own item.
    pub fn permissions(&self, item_id: &str, entries: Vec<Value>) {
        self.fetcher.insert(
            format!("/me/drive/items/{item_id}/permissions"),
            fixtures::permission_list(entries),
        );
    }

    /// An engine over this drive with default settings.
    pub fn engine(&self) -> TallyEngine {
        self.engine_with(EngineConfig::default())
    }

    /// An engine over this drive with the given settings.
    pub fn engine_with(&self, config: EngineConfig) -> TallyEngine {
        TallyEngine::new(Arc::new(self.fetcher.clone()), config)
    }
}

/// Listing path of an own folder.
pub fn own_children(folder_id: &str) -> String {
    format!("/me/drive/items/{folder_id}/children")
}

/// Files `{prefix}0..{prefix}{n}` of `size` bytes each.
pub fn files(prefix: &str, n: usize, size: u64) -> Vec<Value> {
    (0..n)
        .map(|i| fixtures::file(&format!("{prefix}{i}"), &format!("{prefix}{i}.bin"), size))
        .collect()
}

/// The reference tree: A holds files of 10 and 20 bytes, B holds a 5 byte
/// file and folder C, and C holds a 3 byte file. A and B are owned roots.
pub fn reference_tree(drive: &TestDrive) {
    drive.owned(vec![fixtures::folder("A", "A"), fixtures::folder("B", "B")]);
    drive.children(
        "A",
        vec![fixtures::file("a1", "a1.txt", 10), fixtures::file("a2", "a2.txt", 20)],
    );
    drive.children(
        "B",
        vec![fixtures::file("b1", "b1.txt", 5), fixtures::folder("C", "C")],
    );
    drive.children("C", vec![fixtures::file("c1", "c1.txt", 3)]);
    drive.no_permissions(&["A", "B"]);
}
