//! Permission definitions for RBAC.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Actions that can be checked against a principal's effective permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    // -- Form definitions --
    /// View form definitions.
    FormView,
    /// Create form definitions.
    FormCreate,
    /// Edit form definitions.
    FormEdit,
    /// Delete form definitions.
    FormDelete,
    /// Publish a form version.
    FormPublish,

    // -- Form data --
    /// View submitted form data.
    FormdataView,
    /// Submit form data.
    FormdataCreate,
    /// Edit submitted form data.
    FormdataEdit,
    /// Delete submitted form data.
    FormdataDelete,

    // -- Tenant administration --
    /// View groups.
    GroupView,
    /// Create, rename, and archive groups.
    GroupManage,
    /// View users.
    UserView,
    /// Invite users, change status and memberships.
    UserManage,
    /// View the role catalog.
    RoleView,
    /// View tenant settings.
    TenantView,

    // -- System --
    /// Create, suspend, and re-activate tenants.
    TenantManage,
}

/// The effective permissions of a principal.
pub type PermissionSet = BTreeSet<Permission>;

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Permission; 16] = [
        Self::FormView,
        Self::FormCreate,
        Self::FormEdit,
        Self::FormDelete,
        Self::FormPublish,
        Self::FormdataView,
        Self::FormdataCreate,
        Self::FormdataEdit,
        Self::FormdataDelete,
        Self::GroupView,
        Self::GroupManage,
        Self::UserView,
        Self::UserManage,
        Self::RoleView,
        Self::TenantView,
        Self::TenantManage,
    ];

    /// Permissions that only a system administrator holds.
    pub fn is_system(&self) -> bool {
        matches!(self, Self::TenantManage)
    }

    /// Permissions that apply to resources inside a group.
    pub fn is_group_scoped(&self) -> bool {
        matches!(
            self,
            Self::FormView
                | Self::FormCreate
                | Self::FormEdit
                | Self::FormDelete
                | Self::FormPublish
                | Self::FormdataView
                | Self::FormdataCreate
                | Self::FormdataEdit
                | Self::FormdataDelete
        )
    }

    /// The full permission set.
    pub fn all() -> PermissionSet {
        Self::ALL.into_iter().collect()
    }

    /// Everything except system permissions.
    pub fn tenant_scoped() -> PermissionSet {
        Self::ALL.into_iter().filter(|p| !p.is_system()).collect()
    }

    /// The wire name, e.g. `FORMDATA_EDIT`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormView => "FORM_VIEW",
            Self::FormCreate => "FORM_CREATE",
            Self::FormEdit => "FORM_EDIT",
            Self::FormDelete => "FORM_DELETE",
            Self::FormPublish => "FORM_PUBLISH",
            Self::FormdataView => "FORMDATA_VIEW",
            Self::FormdataCreate => "FORMDATA_CREATE",
            Self::FormdataEdit => "FORMDATA_EDIT",
            Self::FormdataDelete => "FORMDATA_DELETE",
            Self::GroupView => "GROUP_VIEW",
            Self::GroupManage => "GROUP_MANAGE",
            Self::UserView => "USER_VIEW",
            Self::UserManage => "USER_MANAGE",
            Self::RoleView => "ROLE_VIEW",
            Self::TenantView => "TENANT_VIEW",
            Self::TenantManage => "TENANT_MANAGE",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = formhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| formhub_core::AppError::validation(format!("Unknown permission: '{s}'")))
    }
}
