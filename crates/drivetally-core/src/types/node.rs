//! Storage items as projected from the upstream listing.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which root listing a top-level node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Listed under the user's own drive root.
    Owned,
    /// Listed by the shared-with-me endpoint.
    Shared,
}

impl Provenance {
    /// Return the provenance as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::Shared => "shared",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Location of an item that lives in another user's drive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteRef {
    /// Drive that owns the item, when the upstream reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
    /// Item id inside that drive.
    pub item_id: String,
}

/// Where an item's children and permissions are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemAddress {
    /// Owning drive; `None` means the signed-in user's own drive.
    pub drive_id: Option<String>,
    /// Item id inside that drive.
    pub item_id: String,
}

impl fmt::Display for ItemAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.drive_id {
            Some(drive) => write!(f, "{drive}!{}", self.item_id),
            None => write!(f, "{}", self.item_id),
        }
    }
}

/// One file or folder.
///
/// `size` is the upstream-reported byte count and is only meaningful for
/// files; folders contribute nothing directly to an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Provider-assigned identifier, stable across calls.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Byte size as reported upstream.
    pub size: u64,
    /// Whether the item has a folder facet.
    pub is_folder: bool,
    /// Set when the item is a reference into another user's tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteRef>,
    /// Drive the listing entry itself lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
    /// Root-level annotation; always `None` below the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    /// Last modification time, when the upstream reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Node {
    /// Create a file node.
    pub fn file(id: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            is_folder: false,
            remote: None,
            drive_id: None,
            provenance: None,
            last_modified: None,
        }
    }

    /// Create a folder node.
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            is_folder: true,
            ..Self::file(id, name, 0)
        }
    }

    /// Mark the node as a reference to an item in another drive.
    pub fn with_remote(mut self, drive_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        self.remote = Some(RemoteRef {
            drive_id: Some(drive_id.into()),
            item_id: item_id.into(),
        });
        self
    }

    /// Record the drive the entry was listed from.
    pub fn in_drive(mut self, drive_id: impl Into<String>) -> Self {
        self.drive_id = Some(drive_id.into());
        self
    }

    /// Tag a root-level node with its provenance.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    /// Whether the node is a reference into another user's tree.
    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// The item this node resolves to: the remote target for references,
    /// the entry itself otherwise.
    pub fn address(&self) -> ItemAddress {
        match &self.remote {
            Some(remote) => ItemAddress {
                drive_id: remote.drive_id.clone(),
                item_id: remote.item_id.clone(),
            },
            None => ItemAddress {
                drive_id: self.drive_id.clone(),
                item_id: self.id.clone(),
            },
        }
    }

    /// Identity used by the cycle guard.
    ///
    /// Remote references are keyed by the item they point at, so a shared
    /// folder reached again through a different reference is still caught.
    pub fn traversal_key(&self) -> String {
        self.address().to_string()
    }
}
