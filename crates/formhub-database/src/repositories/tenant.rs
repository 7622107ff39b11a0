//! Tenant repository implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::traits::DocumentStore;
use formhub_core::types::{Document, Filter, TenantId};
use formhub_entity::tenant::{Tenant, TenantStatus};

/// Repository for the global tenant collection.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    store: Arc<dyn DocumentStore>,
}

impl TenantRepository {
    /// Create a new tenant repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Insert a new tenant. Fails with `Conflict` if the key is taken.
    pub async fn create(&self, tenant: &Tenant) -> AppResult<Tenant> {
        let stored = self
            .store
            .insert(&Tenant::COLLECTION, to_document(tenant)?)
            .await?;
        info!(tenant = %tenant.key, tenant_id = %tenant.id, "Tenant created");
        from_document(stored)
    }

    /// Find a tenant by public key.
    pub async fn find_by_key(&self, key: &str) -> AppResult<Option<Tenant>> {
        let filter = Filter::new().eq("key", key.trim().to_lowercase());
        self.first(filter).await
    }

    /// Find a tenant by id.
    pub async fn find_by_id(&self, id: TenantId) -> AppResult<Option<Tenant>> {
        self.first(Filter::new().eq("id", id.to_string())).await
    }

    /// List every tenant.
    pub async fn list(&self) -> AppResult<Vec<Tenant>> {
        self.store
            .find(&Tenant::COLLECTION, &Filter::new())
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Change a tenant's status, compare-and-swap on its revision.
    pub async fn set_status(
        &self,
        tenant: &Tenant,
        status: TenantStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Tenant> {
        let mut updated = tenant.clone();
        updated.status = status;
        updated.updated_at = now;
        let filter = Filter::new().eq("id", tenant.id.to_string());
        let stored = self
            .store
            .replace(&Tenant::COLLECTION, &filter, to_document(&updated)?, tenant.revision)
            .await?;
        info!(tenant = %tenant.key, %status, "Tenant status changed");
        from_document(stored)
    }

    async fn first(&self, filter: Filter) -> AppResult<Option<Tenant>> {
        self.store
            .find(&Tenant::COLLECTION, &filter)
            .await?
            .into_iter()
            .next()
            .map(from_document)
            .transpose()
    }
}

fn to_document(tenant: &Tenant) -> AppResult<Document> {
    match serde_json::to_value(tenant)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::internal("Tenant did not serialize to an object")),
    }
}

fn from_document(doc: Document) -> AppResult<Tenant> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use formhub_core::error::ErrorKind;
    use formhub_entity::tenant::CreateTenant;

    fn tenant(key: &str) -> Tenant {
        CreateTenant {
            key: key.into(),
            display_name: key.into(),
        }
        .into_tenant(Utc::now())
        .expect("valid")
    }

    #[tokio::test]
    async fn test_keys_are_globally_unique() {
        let repo = TenantRepository::new(Arc::new(MemoryDocumentStore::new()));
        repo.create(&tenant("acme")).await.expect("first");
        let err = repo.create(&tenant("acme")).await.expect_err("duplicate");
        assert!(err.is(ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_set_status() {
        let repo = TenantRepository::new(Arc::new(MemoryDocumentStore::new()));
        let created = repo.create(&tenant("acme")).await.expect("create");
        let suspended = repo
            .set_status(&created, TenantStatus::Suspended, Utc::now())
            .await
            .expect("suspend");
        assert_eq!(suspended.status, TenantStatus::Suspended);
        assert_eq!(suspended.revision, 2);

        let found = repo.find_by_key("ACME").await.expect("find").expect("exists");
        assert_eq!(found.status, TenantStatus::Suspended);
    }
}
