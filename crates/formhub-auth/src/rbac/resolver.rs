//! Effective permission resolution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use formhub_core::error::AppError;
use formhub_core::types::{GroupId, TenantId};
use formhub_entity::role::{Permission, PermissionSet};
use formhub_entity::user::User;

use super::catalog::RoleCatalog;

/// The group (and its tenant) a permission check targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupContext {
    /// The target group.
    pub group_id: GroupId,
    /// The group's tenant.
    pub tenant_id: TenantId,
}

/// Computes what a principal may do.
#[derive(Debug, Clone, Default)]
pub struct RbacResolver {
    catalog: RoleCatalog,
}

impl RbacResolver {
    /// Create a resolver over a role catalog.
    pub fn new(catalog: RoleCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog in use.
    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Effective permissions of `user` in `group`.
    ///
    /// System admins hold everything; tenant admins hold every tenant-scoped
    /// permission inside their own tenant; otherwise the union of the active
    /// catalog roles assigned in that group's membership.
    pub fn compute_permissions(&self, user: &User, group: &GroupContext) -> PermissionSet {
        if user.is_system_admin {
            return Permission::all();
        }
        if user.is_tenant_admin && group.tenant_id == user.tenant_id {
            return Permission::tenant_scoped();
        }
        if group.tenant_id != user.tenant_id {
            return PermissionSet::new();
        }
        let Some(roles) = user.memberships.roles_for(group.group_id) else {
            return PermissionSet::new();
        };

        roles
            .iter()
            .filter_map(|key| match self.catalog.get(key) {
                Some(role) if role.is_active() => Some(role),
                Some(_) => None,
                None => {
                    debug!(role = %key, user_id = %user.id, "Ignoring unknown role key");
                    None
                }
            })
            .flat_map(|role| role.permissions.iter().copied())
            .collect()
    }

    /// Whether `user` holds `permission` in `group`.
    pub fn has_permission(&self, user: &User, group: &GroupContext, permission: Permission) -> bool {
        self.compute_permissions(user, group).contains(&permission)
    }

    /// `Forbidden` unless `user` holds `permission` in `group`.
    pub fn require_permission(
        &self,
        user: &User,
        group: &GroupContext,
        permission: Permission,
    ) -> Result<(), AppError> {
        if self.has_permission(user, group, permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Missing permission {permission} in group {}",
                group.group_id
            )))
        }
    }

    /// Tenant-level permissions for administrative routes.
    pub fn compute_tenant_permissions(&self, user: &User, tenant_id: TenantId) -> PermissionSet {
        if user.is_system_admin {
            Permission::all()
        } else if user.is_tenant_admin && user.tenant_id == tenant_id {
            Permission::tenant_scoped()
        } else {
            PermissionSet::new()
        }
    }

    /// `Forbidden` unless `user` holds `permission` at tenant level.
    pub fn require_tenant_permission(
        &self,
        user: &User,
        tenant_id: TenantId,
        permission: Permission,
    ) -> Result<(), AppError> {
        if self.compute_tenant_permissions(user, tenant_id).contains(&permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!("Missing permission {permission}")))
        }
    }
}
