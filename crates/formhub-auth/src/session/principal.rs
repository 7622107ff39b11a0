//! The sanitized principal projection returned to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use formhub_core::types::{GroupId, TenantId, UserId};
use formhub_entity::user::{User, UserStatus};

/// Client-facing view of a principal.
///
/// Never carries the password hash, role sets, or token version; only the
/// ids of the groups the principal belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipalView {
    /// Shape version of this projection.
    pub view_version: u32,
    /// User id.
    pub id: UserId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Account status.
    pub status: UserStatus,
    /// System administrator flag.
    pub is_system_admin: bool,
    /// Tenant administrator flag.
    pub is_tenant_admin: bool,
    /// Preferred group.
    pub default_group_id: Option<GroupId>,
    /// Groups the principal belongs to.
    pub group_ids: Vec<GroupId>,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl PrincipalView {
    /// Current projection version.
    pub const VERSION: u32 = 1;
}

impl From<&User> for PrincipalView {
    fn from(user: &User) -> Self {
        Self {
            view_version: Self::VERSION,
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            status: user.status,
            is_system_admin: user.is_system_admin,
            is_tenant_admin: user.is_tenant_admin,
            default_group_id: user.default_group_id,
            group_ids: user.memberships.group_ids(),
            last_login_at: user.last_login_at,
        }
    }
}
