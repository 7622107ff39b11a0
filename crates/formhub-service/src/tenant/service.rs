//! Tenant lifecycle: create, list, suspend, re-activate.
//!
//! These are system-administrator operations. HTTP callers are checked
//! through [`TenantService::authorize`]; the operator CLI calls the
//! service directly.

use std::sync::Arc;

use tracing::info;

use formhub_auth::password::{PasswordHasher, PasswordValidator};
use formhub_auth::rbac::RbacResolver;
use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::traits::Clock;
use formhub_database::TenantContext;
use formhub_database::repositories::{TenantRepository, UserRepository};
use formhub_entity::role::Permission;
use formhub_entity::tenant::{CreateTenant, Tenant, TenantStatus, normalize_key};
use formhub_entity::user::{CreateUser, Memberships, User};

/// Input for creating an administrator account from the CLI.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    /// Home tenant key.
    pub tenant_key: String,
    /// Email address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Display name; defaults to the email.
    pub display_name: Option<String>,
    /// Grant system administration (otherwise tenant administration).
    pub system: bool,
}

/// Manages tenants.
#[derive(Clone)]
pub struct TenantService {
    tenants: TenantRepository,
    users: UserRepository,
    rbac: Arc<RbacResolver>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TenantService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantService").finish_non_exhaustive()
    }
}

impl TenantService {
    /// Creates a new tenant service.
    pub fn new(
        tenants: TenantRepository,
        users: UserRepository,
        rbac: Arc<RbacResolver>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tenants,
            users,
            rbac,
            hasher,
            validator,
            clock,
        }
    }

    /// `Forbidden` unless `actor` may manage tenants.
    pub fn authorize(&self, actor: &User) -> AppResult<()> {
        self.rbac
            .require_tenant_permission(actor, actor.tenant_id, Permission::TenantManage)
    }

    /// Create a tenant. Keys are normalized and globally unique.
    pub async fn create(&self, input: CreateTenant) -> AppResult<Tenant> {
        let tenant = input.into_tenant(self.clock.now())?;
        let tenant = self.tenants.create(&tenant).await?;
        info!(tenant = %tenant.key, tenant_id = %tenant.id, "Tenant created");
        Ok(tenant)
    }

    /// All tenants ordered by key.
    pub async fn list(&self) -> AppResult<Vec<Tenant>> {
        self.tenants.list().await
    }

    /// Suspend or re-activate a tenant by key.
    ///
    /// Resolver caches keep serving the previous status until their entries
    /// expire.
    pub async fn set_status(&self, key: &str, status: TenantStatus) -> AppResult<Tenant> {
        let tenant = self.find(key).await?;
        if tenant.status == status {
            return Ok(tenant);
        }
        self.tenants.set_status(&tenant, status, self.clock.now()).await
    }

    /// Create an administrator account. Used to bootstrap a deployment.
    pub async fn create_admin(&self, input: BootstrapAdmin) -> AppResult<User> {
        let tenant = self.find(&input.tenant_key).await?;
        let display_name = input.display_name.unwrap_or_default();
        self.validator
            .validate(&input.password, &[input.email.as_str(), display_name.as_str()])?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let user = self
            .users
            .create(
                &TenantContext::tenant(tenant.id),
                CreateUser {
                    tenant_id: None,
                    email: input.email,
                    display_name,
                    password_hash,
                    is_tenant_admin: true,
                    is_system_admin: input.system,
                    memberships: Memberships::empty(),
                },
                self.clock.now(),
            )
            .await?;
        info!(
            user_id = %user.id,
            tenant = %tenant.key,
            system = user.is_system_admin,
            "Administrator created"
        );
        Ok(user)
    }

    async fn find(&self, key: &str) -> AppResult<Tenant> {
        let key = normalize_key(key)?;
        self.tenants
            .find_by_key(&key)
            .await?
            .ok_or_else(|| AppError::tenant_not_found(format!("Tenant '{key}' not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, PASSWORD};
    use formhub_core::error::ErrorKind;

    fn create(key: &str) -> CreateTenant {
        CreateTenant {
            key: key.into(),
            display_name: format!("{key} Inc."),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let h = Harness::new().await;
        let tenant = h.tenants.create(create("Acme")).await.expect("create");
        assert_eq!(tenant.key, "acme");
        assert!(tenant.is_active());

        let err = h.tenants.create(create("acme")).await.expect_err("duplicate");
        assert!(err.is(ErrorKind::Conflict));
        assert_eq!(h.tenants.list().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_suspend_and_activate() {
        let h = Harness::new().await;
        h.tenants.create(create("acme")).await.expect("create");
        let suspended = h
            .tenants
            .set_status("acme", TenantStatus::Suspended)
            .await
            .expect("suspend");
        assert_eq!(suspended.status, TenantStatus::Suspended);
        let active = h
            .tenants
            .set_status("acme", TenantStatus::Active)
            .await
            .expect("activate");
        assert!(active.is_active());

        let err = h
            .tenants
            .set_status("nope", TenantStatus::Suspended)
            .await
            .expect_err("unknown");
        assert!(err.is(ErrorKind::TenantNotFound));
    }

    #[tokio::test]
    async fn test_lookup_normalizes_operator_input() {
        let h = Harness::new().await;
        h.tenants.create(create("acme")).await.expect("create");
        let tenant = h
            .tenants
            .set_status("  ACME ", TenantStatus::Suspended)
            .await
            .expect("normalized key");
        assert_eq!(tenant.key, "acme");

        let err = h
            .tenants
            .set_status("acme corp", TenantStatus::Suspended)
            .await
            .expect_err("malformed");
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_create_system_admin() {
        let h = Harness::new().await;
        h.tenants.create(create("ops")).await.expect("create");
        let admin = h
            .tenants
            .create_admin(BootstrapAdmin {
                tenant_key: "ops".into(),
                email: "root@formhub.io".into(),
                password: PASSWORD.into(),
                display_name: None,
                system: true,
            })
            .await
            .expect("admin");
        assert!(admin.is_system_admin);
        assert!(h.tenants.authorize(&admin).is_ok());
    }

    #[tokio::test]
    async fn test_tenant_admin_cannot_manage_tenants() {
        let h = Harness::new().await;
        let acme = h.tenant("acme").await;
        let admin = h.member(&acme, "admin@acme.io", true, vec![]).await;
        let err = h.tenants.authorize(&admin.user).expect_err("not system");
        assert!(err.is(ErrorKind::Forbidden));
    }
}
