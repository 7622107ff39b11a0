//! Request DTOs with validation.

use serde::Deserialize;
use validator::Validate;

use formhub_auth::session::RegisterInput;
use formhub_core::types::GroupId;
use formhub_entity::tenant::{CreateTenant, TenantStatus};
use formhub_entity::user::UserStatus;
use formhub_service::user::{InviteUser, MembershipInput};

/// Self-service registration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Display name.
    #[validate(length(max = 200))]
    pub display_name: Option<String>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Tenant key; optional when the email is unique across tenants.
    #[serde(default)]
    pub tenant_key: Option<String>,
}

/// Token refresh request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
    /// Issue a new refresh token and revoke every earlier one.
    #[serde(default)]
    pub rotate: bool,
}

/// Create a group.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    /// Key, unique in the tenant.
    #[validate(length(min = 2, max = 63))]
    pub key: String,
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

/// Query for group listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListGroupsQuery {
    /// Include archived groups.
    #[serde(default)]
    pub include_archived: bool,
}

/// One membership in a request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MembershipRequest {
    /// Target group.
    pub group_id: GroupId,
    /// Role keys.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<MembershipRequest> for MembershipInput {
    fn from(req: MembershipRequest) -> Self {
        Self {
            group_id: req.group_id,
            roles: req.roles.into_iter().collect(),
        }
    }
}

/// Invite (create) a user in the tenant.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteUserRequest {
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Initial password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Display name.
    #[validate(length(max = 200))]
    pub display_name: Option<String>,
    /// Grant tenant administration.
    #[serde(default)]
    pub is_tenant_admin: bool,
    /// Initial memberships.
    #[serde(default)]
    #[validate(nested)]
    pub memberships: Vec<MembershipRequest>,
}

impl From<InviteUserRequest> for InviteUser {
    fn from(req: InviteUserRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
            is_tenant_admin: req.is_tenant_admin,
            memberships: req.memberships.into_iter().map(Into::into).collect(),
        }
    }
}

/// Replace a user's memberships.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReplaceMembershipsRequest {
    /// The full new membership list.
    #[validate(nested)]
    pub memberships: Vec<MembershipRequest>,
    /// Revision the caller read; a newer stored revision is a conflict.
    #[serde(default)]
    pub expected_revision: Option<u64>,
}

/// Change a user's status.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetUserStatusRequest {
    /// Target status.
    pub status: UserStatus,
}

/// Set or clear the default group.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetDefaultGroupRequest {
    /// Group id, or `null` to clear.
    pub group_id: Option<GroupId>,
}

/// Create a tenant.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTenantRequest {
    /// Public key.
    #[validate(length(min = 2, max = 63))]
    pub key: String,
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub display_name: String,
}

impl From<CreateTenantRequest> for CreateTenant {
    fn from(req: CreateTenantRequest) -> Self {
        Self {
            key: req.key,
            display_name: req.display_name,
        }
    }
}

/// Change a tenant's status.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetTenantStatusRequest {
    /// Target status.
    pub status: TenantStatus,
}
