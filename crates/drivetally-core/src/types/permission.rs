//! Authorization grants attached to an item.

use serde::{Deserialize, Serialize};

/// One grant on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Upstream permission id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name of the grantee; absent for anonymous link shares.
    #[serde(default)]
    pub grantee: Option<String>,
    /// Granted roles in upstream order, without duplicates.
    pub roles: Vec<String>,
    /// Link type (`view`, `edit`, ...) for sharing-link grants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
}

impl Permission {
    /// Create a permission, dropping repeated roles.
    pub fn new<I, S>(grantee: Option<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for role in roles {
            let role = role.into();
            if !unique.contains(&role) {
                unique.push(role);
            }
        }
        Self {
            id: None,
            grantee,
            roles: unique,
            link_type: None,
        }
    }

    /// Set the upstream permission id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the sharing-link type.
    pub fn with_link_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }

    /// Label for presentation: the grantee, or a placeholder for link shares.
    pub fn grantee_label(&self) -> &str {
        match (&self.grantee, &self.link_type) {
            (Some(name), _) => name,
            (None, Some(_)) => "(link)",
            (None, None) => "(unknown)",
        }
    }
}
