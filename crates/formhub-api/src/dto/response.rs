//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use formhub_auth::session::PrincipalView;
use formhub_core::types::{GroupId, TenantId, UserId};
use formhub_entity::group::{Group, GroupStatus};
use formhub_entity::role::Permission;
use formhub_entity::tenant::{Tenant, TenantStatus};
use formhub_entity::user::{User, UserStatus};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// The authenticated principal.
    pub principal: PrincipalView,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Refresh response. `refresh_token` is present only after a rotation.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    /// The principal.
    pub principal: PrincipalView,
    /// Fresh access token.
    pub access_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Rotated refresh token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Rotated refresh token expiration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

/// Membership as seen by administrators.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    /// Group id.
    pub group_id: GroupId,
    /// Role keys.
    pub roles: Vec<String>,
}

/// User as seen by tenant administrators.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    /// User id.
    pub id: UserId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Status.
    pub status: UserStatus,
    /// Tenant administrator flag.
    pub is_tenant_admin: bool,
    /// Default group.
    pub default_group_id: Option<GroupId>,
    /// Memberships with roles.
    pub memberships: Vec<MembershipResponse>,
    /// Revision for compare-and-swap edits.
    pub revision: u64,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Last login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            memberships: user
                .memberships
                .iter()
                .map(|m| MembershipResponse {
                    group_id: m.group_id,
                    roles: m.roles.iter().cloned().collect(),
                })
                .collect(),
            email: user.email,
            display_name: user.display_name,
            status: user.status,
            is_tenant_admin: user.is_tenant_admin,
            default_group_id: user.default_group_id,
            revision: user.revision,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Group summary.
#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    /// Group id.
    pub id: GroupId,
    /// Key.
    pub key: String,
    /// Name.
    pub name: String,
    /// Status.
    pub status: GroupStatus,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            key: group.key,
            name: group.name,
            status: group.status,
            created_at: group.created_at,
        }
    }
}

/// Effective permissions in a group.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionsResponse {
    /// Group id.
    pub group_id: GroupId,
    /// Whether the caller was authenticated.
    pub authenticated: bool,
    /// Sorted permission names.
    pub permissions: Vec<Permission>,
}

/// Tenant summary.
#[derive(Debug, Clone, Serialize)]
pub struct TenantResponse {
    /// Tenant id.
    pub id: TenantId,
    /// Public key.
    pub key: String,
    /// Display name.
    pub display_name: String,
    /// Status.
    pub status: TenantStatus,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Tenant> for TenantResponse {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id,
            key: tenant.key,
            display_name: tenant.display_name,
            status: tenant.status,
            created_at: tenant.created_at,
        }
    }
}

/// Result of a session revocation.
#[derive(Debug, Clone, Serialize)]
pub struct RevokeResponse {
    /// The user's token version after the bump.
    pub token_version: u64,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Whether the document store answered.
    pub store: bool,
}
