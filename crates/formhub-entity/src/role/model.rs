//! Role catalog entry.

use serde::{Deserialize, Serialize};

use super::permission::PermissionSet;

/// Status of a catalog role. Inactive roles grant nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleStatus {
    /// The role grants its permission bundle.
    Active,
    /// The role is retired.
    Inactive,
}

/// A named bundle of permissions assignable within a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Stable key referenced from memberships.
    pub key: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the role is in force.
    pub status: RoleStatus,
    /// Permissions the role grants.
    pub permissions: PermissionSet,
}

impl Role {
    /// Keys carried by admin flags on the principal, never by memberships.
    pub const RESERVED_KEYS: [&'static str; 3] = ["SystemAdmin", "TenantAdmin", "GroupAdmin"];

    /// Whether `key` is reserved.
    pub fn is_reserved(key: &str) -> bool {
        Self::RESERVED_KEYS.contains(&key)
    }

    /// Whether the role grants anything.
    pub fn is_active(&self) -> bool {
        matches!(self.status, RoleStatus::Active)
    }
}
