//! Builders for drive API response items, for seeding a [`MemoryFetcher`].
//!
//! [`MemoryFetcher`]: crate::providers::MemoryFetcher

use serde_json::{Value, json};

/// A file item.
pub fn file(id: &str, name: &str, size: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "size": size,
        "file": {"mimeType": "application/octet-stream"}
    })
}

/// A folder item in the signed-in user's drive.
pub fn folder(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "size": 0,
        "folder": {"childCount": 0}
    })
}

/// A shared-with-me entry pointing at a folder in another drive.
pub fn shared_folder(id: &str, name: &str, drive_id: &str, remote_id: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "remoteItem": {
            "id": remote_id,
            "name": name,
            "folder": {"childCount": 0},
            "parentReference": {"driveId": drive_id}
        }
    })
}

/// A shared-with-me entry pointing at a file in another drive.
pub fn shared_file(id: &str, name: &str, drive_id: &str, remote_id: &str, size: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "remoteItem": {
            "id": remote_id,
            "name": name,
            "size": size,
            "file": {},
            "parentReference": {"driveId": drive_id}
        }
    })
}

/// A permission granted to a named user.
pub fn user_permission(display_name: &str, roles: &[&str]) -> Value {
    json!({
        "roles": roles,
        "grantedToV2": {"user": {"displayName": display_name}}
    })
}

/// A sharing-link permission with no named grantee.
pub fn link_permission(link_type: &str, roles: &[&str]) -> Value {
    json!({
        "roles": roles,
        "link": {"type": link_type, "scope": "anonymous"}
    })
}

/// A single-page permission listing.
pub fn permission_list(entries: Vec<Value>) -> Value {
    json!({ "value": entries })
}
