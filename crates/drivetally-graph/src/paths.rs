//! Endpoint paths, relative to the API root.

use drivetally_core::types::ItemAddress;

/// Children of the signed-in user's drive root.
pub const OWNED_ROOT_CHILDREN: &str = "/me/drive/root/children";

/// Items other users have shared with the signed-in user.
pub const SHARED_WITH_ME: &str = "/me/drive/sharedWithMe";

/// Path of the item itself.
pub fn item(address: &ItemAddress) -> String {
    match &address.drive_id {
        Some(drive) => format!("/drives/{drive}/items/{}", address.item_id),
        None => format!("/me/drive/items/{}", address.item_id),
    }
}

/// First page of the item's children.
pub fn children(address: &ItemAddress) -> String {
    format!("{}/children", item(address))
}

/// The item's permission list.
pub fn permissions(address: &ItemAddress) -> String {
    format!("{}/permissions", item(address))
}
