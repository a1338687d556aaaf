//! JSON shapes returned by the drive API and their conversion into domain types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use drivetally_core::types::{Node, Page, Permission, RemoteRef};

/// A listing response: one batch plus an optional continuation link.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    /// Items in this batch.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Absolute URL of the next batch.
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Presence marks the item as a folder.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    /// Number of direct children, as reported by the upstream.
    #[serde(default)]
    pub child_count: Option<u64>,
}

/// Reference to the parent of an item.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReference {
    /// Drive holding the item.
    #[serde(default)]
    pub drive_id: Option<String>,
}

/// The `remoteItem` facet of a shared item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItem {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub folder: Option<FolderFacet>,
    #[serde(default)]
    pub parent_reference: Option<ItemReference>,
}

/// One drive item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub folder: Option<FolderFacet>,
    #[serde(default)]
    pub remote_item: Option<RemoteItem>,
    #[serde(default)]
    pub parent_reference: Option<ItemReference>,
    #[serde(default)]
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl From<DriveItem> for Node {
    fn from(item: DriveItem) -> Self {
        let remote = item.remote_item.as_ref();

        // Shared items usually carry their folder facet and size only inside remoteItem.
        let is_folder =
            item.folder.is_some() || remote.is_some_and(|r| r.folder.is_some());
        let size = item.size.or_else(|| remote.and_then(|r| r.size)).unwrap_or(0);
        let name = item
            .name
            .or_else(|| remote.and_then(|r| r.name.clone()))
            .unwrap_or_default();

        Node {
            id: item.id,
            name,
            size,
            is_folder,
            remote: item.remote_item.map(|r| RemoteRef {
                drive_id: r.parent_reference.and_then(|p| p.drive_id),
                item_id: r.id,
            }),
            drive_id: item.parent_reference.and_then(|p| p.drive_id),
            provenance: None,
            last_modified: item.last_modified_date_time,
        }
    }
}

impl From<ListResponse<DriveItem>> for Page<Node> {
    fn from(list: ListResponse<DriveItem>) -> Self {
        Page {
            items: list.value.into_iter().map(Node::from).collect(),
            next: list.next_link,
        }
    }
}

/// A principal as it appears in an identity set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    fn label(&self) -> Option<String> {
        self.display_name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| self.email.clone().filter(|e| !e.is_empty()))
    }
}

/// The principals a permission is granted to.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySet {
    #[serde(default)]
    pub user: Option<Identity>,
    #[serde(default)]
    pub site_user: Option<Identity>,
    #[serde(default)]
    pub group: Option<Identity>,
    #[serde(default)]
    pub site_group: Option<Identity>,
    #[serde(default)]
    pub application: Option<Identity>,
}

impl IdentitySet {
    fn label(&self) -> Option<String> {
        [
            &self.user,
            &self.site_user,
            &self.group,
            &self.site_group,
            &self.application,
        ]
        .into_iter()
        .flatten()
        .find_map(Identity::label)
    }
}

/// The `link` facet of a sharing-link permission.
#[derive(Debug, Deserialize)]
pub struct SharingLink {
    #[serde(rename = "type", default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// One permission entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, rename = "grantedToV2")]
    pub granted_to_v2: Option<IdentitySet>,
    #[serde(default)]
    pub granted_to: Option<IdentitySet>,
    #[serde(default, rename = "grantedToIdentitiesV2")]
    pub granted_to_identities_v2: Vec<IdentitySet>,
    #[serde(default)]
    pub link: Option<SharingLink>,
}

impl From<PermissionEntry> for Permission {
    fn from(entry: PermissionEntry) -> Self {
        let grantee = entry
            .granted_to_v2
            .as_ref()
            .and_then(IdentitySet::label)
            .or_else(|| entry.granted_to.as_ref().and_then(IdentitySet::label))
            .or_else(|| {
                entry
                    .granted_to_identities_v2
                    .iter()
                    .find_map(IdentitySet::label)
            });

        let mut permission = Permission::new(grantee, entry.roles);
        if let Some(id) = entry.id {
            permission = permission.with_id(id);
        }
        if let Some(link_type) = entry.link.and_then(|l| l.link_type) {
            permission = permission.with_link_type(link_type);
        }
        permission
    }
}
