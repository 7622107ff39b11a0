//! Tenant-admin operations on users.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use formhub_auth::password::{PasswordHasher, PasswordValidator};
use formhub_auth::rbac::RbacResolver;
use formhub_auth::token::TokenService;
use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::types::{GroupId, UserId};
use formhub_database::repositories::{GroupRepository, UserRepository};
use formhub_entity::role::Permission;
use formhub_entity::user::{CreateUser, Membership, Memberships, User, UserStatus};

use crate::context::RequestContext;

/// Invite input: the account is created directly with the given password.
#[derive(Debug, Clone, Deserialize)]
pub struct InviteUser {
    /// Email address.
    pub email: String,
    /// Initial password (checked against the password policy).
    pub password: String,
    /// Display name; defaults to the email.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Grant tenant administration.
    #[serde(default)]
    pub is_tenant_admin: bool,
    /// Initial memberships.
    #[serde(default)]
    pub memberships: Vec<MembershipInput>,
}

/// One membership in an edit request.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipInput {
    /// Target group.
    pub group_id: GroupId,
    /// Role keys from the catalog.
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

/// Handles user administration inside a tenant.
#[derive(Clone)]
pub struct UserAdminService {
    users: UserRepository,
    groups: GroupRepository,
    rbac: Arc<RbacResolver>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

impl std::fmt::Debug for UserAdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAdminService").finish_non_exhaustive()
    }
}

impl UserAdminService {
    /// Creates a new user admin service.
    pub fn new(
        users: UserRepository,
        groups: GroupRepository,
        rbac: Arc<RbacResolver>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
    ) -> Self {
        Self {
            users,
            groups,
            rbac,
            tokens,
            hasher,
            validator,
        }
    }

    /// List non-deleted users of the tenant.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        self.rbac
            .require_tenant_permission(&ctx.actor, ctx.tenant_id(), Permission::UserView)?;
        self.users.list(&ctx.scope()).await
    }

    /// Create an account in the tenant on behalf of an administrator.
    pub async fn invite(&self, ctx: &RequestContext, input: InviteUser) -> AppResult<User> {
        self.rbac
            .require_tenant_permission(&ctx.actor, ctx.tenant_id(), Permission::UserManage)?;

        let display_name = input.display_name.unwrap_or_default();
        self.validator
            .validate(&input.password, &[input.email.as_str(), display_name.as_str()])?;
        let memberships = self.build_memberships(ctx, input.memberships).await?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let user = self
            .users
            .create(
                &ctx.scope(),
                CreateUser {
                    tenant_id: None,
                    email: input.email,
                    display_name,
                    password_hash,
                    is_tenant_admin: input.is_tenant_admin,
                    is_system_admin: false,
                    memberships,
                },
                ctx.request_time,
            )
            .await?;
        info!(user_id = %user.id, tenant = %ctx.tenant.key, actor = %ctx.actor.id, "User invited");
        Ok(user)
    }

    /// Replace a user's whole membership list.
    ///
    /// Read-modify-replace under revision CAS. When `expected_revision` is
    /// given, the stored user must still be at that revision.
    pub async fn replace_memberships(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        items: Vec<MembershipInput>,
        expected_revision: Option<u64>,
    ) -> AppResult<User> {
        self.rbac
            .require_tenant_permission(&ctx.actor, ctx.tenant_id(), Permission::UserManage)?;

        let memberships = self.build_memberships(ctx, items).await?;
        let mut user = self.load(ctx, user_id).await?;
        if let Some(expected) = expected_revision {
            if expected != user.revision {
                return Err(AppError::conflict(format!(
                    "User {user_id} is at revision {}, expected {expected}",
                    user.revision
                )));
            }
        }

        user.replace_memberships(memberships);
        user.updated_at = ctx.request_time;
        let user = self.users.save(&ctx.scope(), &user).await?;
        info!(
            user_id = %user.id,
            groups = user.memberships.len(),
            actor = %ctx.actor.id,
            "Memberships replaced"
        );
        Ok(user)
    }

    /// Move a user through the status machine.
    ///
    /// Leaving `active` also revokes every refresh credential.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        status: UserStatus,
    ) -> AppResult<User> {
        self.rbac
            .require_tenant_permission(&ctx.actor, ctx.tenant_id(), Permission::UserManage)?;
        if user_id == ctx.actor.id && status != UserStatus::Active {
            return Err(AppError::validation("Administrators cannot deactivate themselves"));
        }

        let mut user = self.load(ctx, user_id).await?;
        let previous = user.status;
        user.status = previous.transition_to(status)?;
        user.updated_at = ctx.request_time;
        let user = self.users.save(&ctx.scope(), &user).await?;

        let user = if previous.can_login() && !user.can_login() {
            self.users
                .increment_token_version(&ctx.scope(), user.id, user.tenant_id)
                .await?
                .unwrap_or(user)
        } else {
            user
        };
        info!(user_id = %user.id, from = %previous, to = %user.status, actor = %ctx.actor.id, "User status changed");
        Ok(user)
    }

    /// Set or clear a user's default group; it must be one of the user's
    /// memberships.
    pub async fn set_default_group(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        group_id: Option<GroupId>,
    ) -> AppResult<User> {
        if user_id != ctx.actor.id {
            self.rbac
                .require_tenant_permission(&ctx.actor, ctx.tenant_id(), Permission::UserManage)?;
        }
        let mut user = self.load(ctx, user_id).await?;
        user.set_default_group(group_id)?;
        user.updated_at = ctx.request_time;
        self.users.save(&ctx.scope(), &user).await
    }

    /// Revoke every refresh credential of a user in this tenant.
    pub async fn revoke_sessions(&self, ctx: &RequestContext, user_id: UserId) -> AppResult<u64> {
        self.rbac
            .require_tenant_permission(&ctx.actor, ctx.tenant_id(), Permission::UserManage)?;
        let user = self.load(ctx, user_id).await?;
        let version = self.tokens.invalidate_all(user.id).await?;
        info!(user_id = %user.id, actor = %ctx.actor.id, "Sessions revoked");
        Ok(version)
    }

    async fn load(&self, ctx: &RequestContext, user_id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(&ctx.scope(), user_id)
            .await?
            .filter(|u| u.status != UserStatus::Deleted)
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Validate that every group exists in the tenant and every role key is
    /// in the catalog.
    async fn build_memberships(
        &self,
        ctx: &RequestContext,
        items: Vec<MembershipInput>,
    ) -> AppResult<Memberships> {
        let scope = ctx.scope();
        let mut memberships = Vec::with_capacity(items.len());
        for item in items {
            let group = self
                .groups
                .find_by_id(&scope, item.group_id)
                .await?
                .ok_or_else(|| AppError::validation(format!("Unknown group {}", item.group_id)))?;
            if !group.is_active() {
                return Err(AppError::validation(format!("Group '{}' is archived", group.key)));
            }
            if let Some(unknown) = item
                .roles
                .iter()
                .find(|r| !self.rbac.catalog().contains(r))
            {
                return Err(AppError::validation(format!("Unknown role '{unknown}'")));
            }
            memberships.push(Membership::new(group.id, item.roles));
        }
        Memberships::new(memberships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, PASSWORD};
    use formhub_core::error::ErrorKind;

    fn membership(group_id: GroupId, roles: &[&str]) -> MembershipInput {
        MembershipInput {
            group_id,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_invite_and_list() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let ctx = h.context(&admin, &acme);

        let invited = h
            .users
            .invite(
                &ctx,
                InviteUser {
                    email: "Bob@Acme.io".into(),
                    password: PASSWORD.into(),
                    display_name: Some("Bob".into()),
                    is_tenant_admin: false,
                    memberships: vec![],
                },
            )
            .await
            .expect("invite");
        assert_eq!(invited.email, "bob@acme.io");
        assert_eq!(invited.tenant_id, acme.tenant_id);
        assert_eq!(h.users.list(&ctx).await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn test_replace_memberships_validates_groups_and_roles() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let ctx = h.context(&admin, &acme);
        let ops = h.group(&ctx, "ops").await;
        let bob = h.member(&acme, "bob@acme.io", false, vec![]).await;

        let err = h
            .users
            .replace_memberships(&ctx, bob.user.id, vec![membership(ops.id, &["Wizard"])], None)
            .await
            .expect_err("unknown role");
        assert!(err.is(ErrorKind::Validation));

        let err = h
            .users
            .replace_memberships(&ctx, bob.user.id, vec![membership(GroupId::new(), &["Viewer"])], None)
            .await
            .expect_err("unknown group");
        assert!(err.is(ErrorKind::Validation));

        let err = h
            .users
            .replace_memberships(&ctx, bob.user.id, vec![membership(ops.id, &["TenantAdmin"])], None)
            .await
            .expect_err("reserved role");
        assert!(err.is(ErrorKind::Validation));

        let updated = h
            .users
            .replace_memberships(&ctx, bob.user.id, vec![membership(ops.id, &["Operator"])], None)
            .await
            .expect("replace");
        assert!(updated.memberships.contains(ops.id));
    }

    #[tokio::test]
    async fn test_replace_memberships_detects_stale_revision() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let ctx = h.context(&admin, &acme);
        let ops = h.group(&ctx, "ops").await;
        let bob = h.member(&acme, "bob@acme.io", false, vec![]).await;
        let seen = bob.user.revision;

        h.users
            .replace_memberships(&ctx, bob.user.id, vec![membership(ops.id, &["Viewer"])], Some(seen))
            .await
            .expect("first edit");
        let err = h
            .users
            .replace_memberships(&ctx, bob.user.id, vec![], Some(seen))
            .await
            .expect_err("lost update");
        assert!(err.is(ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_dropping_default_group_clears_it() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let ctx = h.context(&admin, &acme);
        let ops = h.group(&ctx, "ops").await;
        let bob = h.member(&acme, "bob@acme.io", false, vec![]).await;

        h.users
            .replace_memberships(&ctx, bob.user.id, vec![membership(ops.id, &["Viewer"])], None)
            .await
            .expect("add");
        let with_default = h
            .users
            .set_default_group(&ctx, bob.user.id, Some(ops.id))
            .await
            .expect("default");
        assert_eq!(with_default.default_group_id, Some(ops.id));

        let cleared = h
            .users
            .replace_memberships(&ctx, bob.user.id, vec![], None)
            .await
            .expect("remove");
        assert_eq!(cleared.default_group_id, None);

        let err = h
            .users
            .set_default_group(&ctx, bob.user.id, Some(ops.id))
            .await
            .expect_err("not a member");
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_suspension_revokes_refresh_tokens() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let ctx = h.context(&admin, &acme);
        let bob = h.member(&acme, "bob@acme.io", false, vec![]).await;
        let tokens = h.tokens.issue_tokens(&bob.user).expect("issue");

        let suspended = h
            .users
            .set_status(&ctx, bob.user.id, UserStatus::Suspended)
            .await
            .expect("suspend");
        assert_eq!(suspended.status, UserStatus::Suspended);
        assert_eq!(suspended.token_version, bob.user.token_version + 1);

        h.users
            .set_status(&ctx, bob.user.id, UserStatus::Active)
            .await
            .expect("reactivate");
        let err = h
            .tokens
            .rotate_refresh_token(&tokens.refresh_token, false)
            .await
            .expect_err("revoked by suspension");
        assert!(err.is(ErrorKind::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn test_deleted_is_terminal_and_hidden() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let ctx = h.context(&admin, &acme);
        let bob = h.member(&acme, "bob@acme.io", false, vec![]).await;

        h.users
            .set_status(&ctx, bob.user.id, UserStatus::Deleted)
            .await
            .expect("delete");
        assert_eq!(h.users.list(&ctx).await.expect("list").len(), 1);
        let err = h
            .users
            .set_status(&ctx, bob.user.id, UserStatus::Active)
            .await
            .expect_err("terminal");
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_admin_of_other_tenant_is_forbidden() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let globex = h.tenant("globex").await;
        let globex_admin = h.member(&globex, "admin@globex.io", true, vec![]).await;
        let bob = h.member(&acme, "bob@acme.io", false, vec![]).await;

        let err = h
            .users
            .revoke_sessions(&h.context(&globex_admin, &acme), bob.user.id)
            .await
            .expect_err("foreign admin");
        assert!(err.is(ErrorKind::Forbidden));

        let err = h
            .users
            .revoke_sessions(&h.context(&globex_admin, &globex), bob.user.id)
            .await
            .expect_err("user lives elsewhere");
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_revoke_sessions_bumps_version() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let bob = h.member(&acme, "bob@acme.io", false, vec![]).await;
        let version = h
            .users
            .revoke_sessions(&h.context(&admin, &acme), bob.user.id)
            .await
            .expect("revoke");
        assert_eq!(version, bob.user.token_version + 1);
    }
}
