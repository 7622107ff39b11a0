//! Tenant resolver with a bounded TTL cache.
//!
//! Lookups by public key are cached for a fixed TTL and never invalidated
//! on status change, so a suspension becomes visible within one TTL.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use formhub_cache::TtlCache;
use formhub_core::config::TenantConfig;
use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::traits::Clock;
use formhub_core::types::TenantId;
use formhub_database::repositories::TenantRepository;
use formhub_entity::tenant::{Tenant, TenantStatus};

/// The outcome of resolving a public tenant key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTenant {
    /// Internal tenant id.
    pub tenant_id: TenantId,
    /// Normalized public key.
    pub key: String,
    /// Status at lookup time.
    pub status: TenantStatus,
}

impl From<&Tenant> for ResolvedTenant {
    fn from(tenant: &Tenant) -> Self {
        Self {
            tenant_id: tenant.id,
            key: tenant.key.clone(),
            status: tenant.status,
        }
    }
}

/// Maps public tenant keys to tenants.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    tenants: TenantRepository,
    cache: TtlCache<String, ResolvedTenant>,
}

impl TenantResolver {
    /// Create a resolver with the configured cache capacity and TTL.
    pub fn new(tenants: TenantRepository, config: &TenantConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            tenants,
            cache: TtlCache::new(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_seconds),
                clock,
            ),
        }
    }

    /// Resolve a public key to an active tenant.
    ///
    /// Fails with `MissingTenant` for a blank key, `TenantNotFound` for an
    /// unknown key, and `TenantSuspended` for a known inactive tenant.
    pub async fn resolve(&self, key: &str) -> AppResult<ResolvedTenant> {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return Err(AppError::missing_tenant("A tenant key is required"));
        }

        let resolved = match self.cache.get(&key).await {
            Some(hit) => hit,
            None => {
                let tenant = self
                    .tenants
                    .find_by_key(&key)
                    .await?
                    .ok_or_else(|| AppError::tenant_not_found(format!("Unknown tenant '{key}'")))?;
                let resolved = ResolvedTenant::from(&tenant);
                debug!(tenant = %key, status = %resolved.status, "Tenant cached");
                self.cache.insert(key.clone(), resolved.clone()).await;
                resolved
            }
        };

        if !resolved.status.is_active() {
            warn!(tenant = %key, "Request for suspended tenant");
            return Err(AppError::tenant_suspended(format!(
                "Tenant '{key}' is suspended"
            )));
        }
        Ok(resolved)
    }

    /// Check by id, uncached, that a tenant exists and is active.
    pub async fn ensure_active(&self, tenant_id: TenantId) -> AppResult<Tenant> {
        let tenant = self
            .tenants
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| AppError::tenant_not_found(format!("Unknown tenant {tenant_id}")))?;
        if !tenant.is_active() {
            return Err(AppError::tenant_suspended(format!(
                "Tenant '{}' is suspended",
                tenant.key
            )));
        }
        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use formhub_core::error::ErrorKind;
    use formhub_core::traits::ManualClock;
    use formhub_database::MemoryDocumentStore;
    use formhub_entity::tenant::CreateTenant;

    async fn setup() -> (TenantResolver, TenantRepository, ManualClock, Tenant) {
        let repo = TenantRepository::new(Arc::new(MemoryDocumentStore::new()));
        let tenant = CreateTenant {
            key: "acme".into(),
            display_name: "Acme".into(),
        }
        .into_tenant(Utc::now())
        .expect("valid");
        let tenant = repo.create(&tenant).await.expect("create");
        let clock = ManualClock::starting_now();
        let resolver = TenantResolver::new(repo.clone(), &TenantConfig::default(), Arc::new(clock.clone()));
        (resolver, repo, clock, tenant)
    }

    #[tokio::test]
    async fn test_resolves_active_tenant() {
        let (resolver, _, _, tenant) = setup().await;
        let resolved = resolver.resolve(" ACME ").await.expect("resolve");
        assert_eq!(resolved.tenant_id, tenant.id);
        assert_eq!(resolved.key, "acme");
    }

    #[tokio::test]
    async fn test_error_kinds() {
        let (resolver, _, _, _) = setup().await;
        assert!(resolver.resolve("  ").await.expect_err("blank").is(ErrorKind::MissingTenant));
        assert!(
            resolver
                .resolve("globex")
                .await
                .expect_err("unknown")
                .is(ErrorKind::TenantNotFound)
        );
    }

    #[tokio::test]
    async fn test_suspension_visible_after_ttl() {
        let (resolver, repo, clock, tenant) = setup().await;
        resolver.resolve("acme").await.expect("warm cache");

        repo.set_status(&tenant, TenantStatus::Suspended, Utc::now())
            .await
            .expect("suspend");

        clock.advance(chrono::Duration::seconds(30));
        resolver.resolve("acme").await.expect("still cached as active");

        clock.advance(chrono::Duration::seconds(31));
        let err = resolver.resolve("acme").await.expect_err("suspended");
        assert!(err.is(ErrorKind::TenantSuspended));
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let (resolver, repo, _, _) = setup().await;
        assert!(resolver.resolve("globex").await.is_err());
        let globex = CreateTenant {
            key: "globex".into(),
            display_name: "Globex".into(),
        }
        .into_tenant(Utc::now())
        .expect("valid");
        repo.create(&globex).await.expect("create");
        resolver.resolve("globex").await.expect("visible immediately");
    }

    #[tokio::test]
    async fn test_ensure_active_is_uncached() {
        let (resolver, repo, _, tenant) = setup().await;
        resolver.ensure_active(tenant.id).await.expect("active");
        repo.set_status(&tenant, TenantStatus::Suspended, Utc::now())
            .await
            .expect("suspend");
        let err = resolver.ensure_active(tenant.id).await.expect_err("suspended");
        assert!(err.is(ErrorKind::TenantSuspended));
    }
}
