//! Shared fixtures for unit tests.

use std::sync::Arc;

use chrono::Utc;

use formhub_core::config::{AuthConfig, TenantConfig};
use formhub_core::traits::{Clock, ManualClock};
use formhub_database::repositories::{TenantRepository, UserRepository, register_entities};
use formhub_database::{MemoryDocumentStore, TenantIsolationGuard};
use formhub_entity::tenant::CreateTenant;

use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::session::SessionManager;
use crate::tenant::{ResolvedTenant, TenantResolver};
use crate::token::TokenService;

pub(crate) struct Harness {
    pub clock: ManualClock,
    pub tenants: TenantRepository,
    pub users: UserRepository,
    pub resolver: Arc<TenantResolver>,
    pub tokens: Arc<TokenService>,
    pub sessions: SessionManager,
}

impl Harness {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let guard = TenantIsolationGuard::new(store.clone());
        register_entities(&guard);
        let users = UserRepository::new(Arc::new(guard));
        let tenants = TenantRepository::new(store);

        let clock = ManualClock::starting_now();
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());
        let config = AuthConfig::default();

        let resolver = Arc::new(TenantResolver::new(
            tenants.clone(),
            &TenantConfig::default(),
            shared.clone(),
        ));
        let tokens = Arc::new(TokenService::new(
            JwtEncoder::new(&config, shared.clone()),
            JwtDecoder::new(&config, shared.clone()),
            users.clone(),
            resolver.clone(),
        ));
        let sessions = SessionManager::new(
            tokens.clone(),
            resolver.clone(),
            users.clone(),
            PasswordHasher::new(),
            PasswordValidator::new(&config),
            shared,
        );

        Self {
            clock,
            tenants,
            users,
            resolver,
            tokens,
            sessions,
        }
    }

    pub async fn tenant(&self, key: &str) -> ResolvedTenant {
        let tenant = CreateTenant {
            key: key.into(),
            display_name: key.into(),
        }
        .into_tenant(Utc::now())
        .expect("valid tenant");
        self.tenants.create(&tenant).await.expect("create tenant");
        self.resolver.resolve(key).await.expect("resolve tenant")
    }
}
