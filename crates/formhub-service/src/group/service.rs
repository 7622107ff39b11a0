//! Group listing, creation, archival, and effective permissions.

use std::sync::Arc;

use tracing::info;

use formhub_auth::rbac::{GroupContext, RbacResolver};
use formhub_auth::session::AuthenticatedPrincipal;
use formhub_auth::tenant::ResolvedTenant;
use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::types::GroupId;
use formhub_database::TenantContext;
use formhub_database::repositories::GroupRepository;
use formhub_entity::group::{CreateGroup, Group, GroupStatus};
use formhub_entity::role::{Permission, PermissionSet};

use crate::context::RequestContext;

/// Handles group administration inside a tenant.
#[derive(Debug, Clone)]
pub struct GroupService {
    groups: GroupRepository,
    rbac: Arc<RbacResolver>,
}

impl GroupService {
    /// Creates a new group service.
    pub fn new(groups: GroupRepository, rbac: Arc<RbacResolver>) -> Self {
        Self { groups, rbac }
    }

    /// List the tenant's groups.
    pub async fn list(&self, ctx: &RequestContext, include_archived: bool) -> AppResult<Vec<Group>> {
        self.rbac
            .require_tenant_permission(&ctx.actor, ctx.tenant_id(), Permission::GroupView)?;
        let groups = self.groups.list(&ctx.scope()).await?;
        Ok(groups
            .into_iter()
            .filter(|g| include_archived || g.is_active())
            .collect())
    }

    /// Create a group in the tenant.
    pub async fn create(&self, ctx: &RequestContext, key: String, name: String) -> AppResult<Group> {
        self.rbac
            .require_tenant_permission(&ctx.actor, ctx.tenant_id(), Permission::GroupManage)?;
        let group = self
            .groups
            .create(
                &ctx.scope(),
                CreateGroup {
                    tenant_id: None,
                    key,
                    name,
                },
                ctx.request_time,
            )
            .await?;
        info!(group_id = %group.id, tenant = %ctx.tenant.key, actor = %ctx.actor.id, "Group created");
        Ok(group)
    }

    /// Archive a group. Memberships referencing it remain but grant nothing
    /// through listings.
    pub async fn archive(&self, ctx: &RequestContext, group_id: GroupId) -> AppResult<Group> {
        self.rbac
            .require_tenant_permission(&ctx.actor, ctx.tenant_id(), Permission::GroupManage)?;
        let scope = ctx.scope();
        let mut group = self
            .groups
            .find_by_id(&scope, group_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Group {group_id} not found")))?;
        group.status = GroupStatus::Archived;
        group.updated_at = ctx.request_time;
        let group = self.groups.save(&scope, &group).await?;
        info!(group_id = %group.id, actor = %ctx.actor.id, "Group archived");
        Ok(group)
    }

    /// Effective permissions of the caller in a group of `tenant`.
    ///
    /// Anonymous callers get the empty set. An unknown group is `NotFound`.
    pub async fn effective_permissions(
        &self,
        tenant: &ResolvedTenant,
        principal: Option<&AuthenticatedPrincipal>,
        group_id: GroupId,
    ) -> AppResult<PermissionSet> {
        let scope = TenantContext::tenant(tenant.tenant_id);
        let group = self
            .groups
            .find_by_id(&scope, group_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Group {group_id} not found")))?;

        Ok(match principal {
            Some(principal) => self.rbac.compute_permissions(
                &principal.user,
                &GroupContext {
                    group_id: group.id,
                    tenant_id: group.tenant_id,
                },
            ),
            None => PermissionSet::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use formhub_core::error::ErrorKind;
    use formhub_entity::user::Membership;

    #[tokio::test]
    async fn test_tenant_admin_manages_groups() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let ctx = h.context(&admin, &acme);

        let ops = h.groups.create(&ctx, "ops".into(), "Operations".into()).await.expect("create");
        let listed = h.groups.list(&ctx, false).await.expect("list");
        assert_eq!(listed.len(), 1);

        h.groups.archive(&ctx, ops.id).await.expect("archive");
        assert!(h.groups.list(&ctx, false).await.expect("list").is_empty());
        assert_eq!(h.groups.list(&ctx, true).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_plain_member_cannot_create_groups() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let member = h.member(&acme, "ana@acme.io", false, vec![]).await;
        let err = h
            .groups
            .create(&h.context(&member, &acme), "ops".into(), "Ops".into())
            .await
            .expect_err("forbidden");
        assert!(err.is(ErrorKind::Forbidden));
    }

    #[tokio::test]
    async fn test_effective_permissions() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let ops = h
            .groups
            .create(&h.context(&admin, &acme), "ops".into(), "Ops".into())
            .await
            .expect("create");
        let operator = h
            .member(&acme, "op@acme.io", false, vec![Membership::new(ops.id, ["Operator"])])
            .await;

        let perms = h
            .groups
            .effective_permissions(&acme, Some(&operator), ops.id)
            .await
            .expect("permissions");
        assert_eq!(perms, [Permission::FormdataEdit].into_iter().collect());

        let anonymous = h
            .groups
            .effective_permissions(&acme, None, ops.id)
            .await
            .expect("permissions");
        assert!(anonymous.is_empty());
    }

    #[tokio::test]
    async fn test_group_of_other_tenant_is_not_found() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let globex = h.tenant("globex").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let ops = h
            .groups
            .create(&h.context(&admin, &acme), "ops".into(), "Ops".into())
            .await
            .expect("create");
        let err = h
            .groups
            .effective_permissions(&globex, Some(&admin), ops.id)
            .await
            .expect_err("other tenant");
        assert!(err.is(ErrorKind::NotFound));
    }
}
