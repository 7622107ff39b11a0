//! Shared fixtures for unit tests.

use std::sync::Arc;

use chrono::Utc;

use formhub_auth::jwt::{JwtDecoder, JwtEncoder};
use formhub_auth::password::{PasswordHasher, PasswordValidator};
use formhub_auth::rbac::RbacResolver;
use formhub_auth::session::AuthenticatedPrincipal;
use formhub_auth::tenant::{ResolvedTenant, TenantResolver};
use formhub_auth::token::TokenService;
use formhub_core::config::{AuthConfig, TenantConfig};
use formhub_core::traits::{Clock, ManualClock};
use formhub_database::repositories::{
    GroupRepository, TenantRepository, UserRepository, register_entities,
};
use formhub_database::{MemoryDocumentStore, TenantContext, TenantIsolationGuard};
use formhub_entity::group::Group;
use formhub_entity::tenant::CreateTenant;
use formhub_entity::user::{CreateUser, Membership, Memberships};

use crate::context::RequestContext;
use crate::{GroupService, TenantService, UserAdminService};

pub(crate) const PASSWORD: &str = "violet-tractor-93-lagoon";

pub(crate) struct Harness {
    pub user_repo: UserRepository,
    pub resolver: Arc<TenantResolver>,
    pub tokens: Arc<TokenService>,
    pub groups: GroupService,
    pub users: UserAdminService,
    pub tenants: TenantService,
}

impl Harness {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let guard = TenantIsolationGuard::new(store.clone());
        register_entities(&guard);
        let guard = Arc::new(guard);
        let user_repo = UserRepository::new(guard.clone());
        let group_repo = GroupRepository::new(guard);
        let tenant_repo = TenantRepository::new(store);

        let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_now());
        let config = AuthConfig::default();
        let rbac = Arc::new(RbacResolver::default());
        let resolver = Arc::new(TenantResolver::new(
            tenant_repo.clone(),
            &TenantConfig::default(),
            clock.clone(),
        ));
        let tokens = Arc::new(TokenService::new(
            JwtEncoder::new(&config, clock.clone()),
            JwtDecoder::new(&config, clock.clone()),
            user_repo.clone(),
            resolver.clone(),
        ));

        Self {
            groups: GroupService::new(group_repo.clone(), rbac.clone()),
            users: UserAdminService::new(
                user_repo.clone(),
                group_repo,
                rbac.clone(),
                tokens.clone(),
                PasswordHasher::new(),
                PasswordValidator::new(&config),
            ),
            tenants: TenantService::new(
                tenant_repo,
                user_repo.clone(),
                rbac,
                PasswordHasher::new(),
                PasswordValidator::new(&config),
                clock,
            ),
            user_repo,
            resolver,
            tokens,
        }
    }

    pub async fn tenant(&self, key: &str) -> ResolvedTenant {
        self.tenants
            .create(CreateTenant {
                key: key.into(),
                display_name: key.into(),
            })
            .await
            .expect("create tenant");
        self.resolver.resolve(key).await.expect("resolve tenant")
    }

    /// A user in `tenant` with a placeholder hash; these tests never log in.
    pub async fn member(
        &self,
        tenant: &ResolvedTenant,
        email: &str,
        tenant_admin: bool,
        memberships: Vec<Membership>,
    ) -> AuthenticatedPrincipal {
        let user = self
            .user_repo
            .create(
                &TenantContext::tenant(tenant.tenant_id),
                CreateUser {
                    tenant_id: None,
                    email: email.into(),
                    display_name: String::new(),
                    password_hash: "unused".into(),
                    is_tenant_admin: tenant_admin,
                    is_system_admin: false,
                    memberships: Memberships::new(memberships).expect("memberships"),
                },
                Utc::now(),
            )
            .await
            .expect("create user");
        AuthenticatedPrincipal::new(user, false)
    }

    pub async fn group(&self, ctx: &RequestContext, key: &str) -> Group {
        self.groups
            .create(ctx, key.into(), key.to_uppercase())
            .await
            .expect("create group")
    }

    pub fn context(&self, principal: &AuthenticatedPrincipal, tenant: &ResolvedTenant) -> RequestContext {
        RequestContext::new(principal, tenant.clone())
    }
}
