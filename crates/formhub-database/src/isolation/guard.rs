//! The tenant isolation guard.
//!
//! Every tenant-scoped storage call goes through [`TenantIsolationGuard`].
//! Reads get the active tenant merged into their filter in the same call
//! that runs the query; writes are checked against the active tenant before
//! they reach the store.

use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::traits::store::fields;
use formhub_core::traits::{CollectionSpec, DocumentStore, TenantScoped};
use formhub_core::types::{Document, Filter, TenantId};

use super::context::TenantContext;

/// Scopes document store access to the active tenant.
pub struct TenantIsolationGuard {
    store: Arc<dyn DocumentStore>,
    registry: DashMap<TypeId, CollectionSpec>,
}

impl fmt::Debug for TenantIsolationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantIsolationGuard")
            .field("store", &self.store)
            .field("registered", &self.registry.len())
            .finish()
    }
}

impl TenantIsolationGuard {
    /// Create a guard with no registered entity types.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            registry: DashMap::new(),
        }
    }

    /// Register a tenant-scoped entity type. Operations on unregistered
    /// types fail with `Internal`.
    pub fn register<T: TenantScoped>(&self) {
        debug!(entity = type_name::<T>(), collection = T::COLLECTION.name, "Registered tenant-scoped entity");
        self.registry.insert(TypeId::of::<T>(), T::COLLECTION);
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    fn collection<T: TenantScoped>(&self) -> AppResult<CollectionSpec> {
        self.registry
            .get(&TypeId::of::<T>())
            .map(|spec| *spec)
            .ok_or_else(|| {
                AppError::internal(format!(
                    "{} is not registered with the tenant isolation guard",
                    type_name::<T>()
                ))
            })
    }

    /// Merge the active tenant into a read filter, replacing any tenant
    /// condition the caller supplied.
    fn scoped_filter(ctx: &TenantContext, filter: Filter) -> AppResult<Filter> {
        match ctx.tenant_id() {
            Some(tenant) => {
                if filter.mentions(fields::TENANT_ID) {
                    warn!(%tenant, "Caller-supplied tenant condition replaced by active tenant");
                }
                Ok(filter
                    .without(fields::TENANT_ID)
                    .eq(fields::TENANT_ID, tenant.to_string()))
            }
            None if ctx.is_unscoped_system() => Ok(filter),
            None => Err(AppError::tenant_required(
                "Tenant-scoped read attempted without an active tenant",
            )),
        }
    }

    /// Decide the tenant a write targets.
    ///
    /// The document's own tenant wins, then the explicit tenant, then the
    /// active tenant. A target that differs from the active tenant, or a
    /// document and explicit tenant that disagree, is a cross-tenant write.
    fn write_tenant(
        ctx: &TenantContext,
        doc_tenant: Option<TenantId>,
        explicit: Option<TenantId>,
    ) -> AppResult<TenantId> {
        if let (Some(doc), Some(explicit)) = (doc_tenant, explicit) {
            if doc != explicit {
                return Err(AppError::forbidden("Cross-tenant write rejected"));
            }
        }
        let target = doc_tenant
            .or(explicit)
            .or(ctx.tenant_id())
            .ok_or_else(|| {
                AppError::tenant_required("Tenant-scoped write attempted without a tenant")
            })?;
        if let Some(active) = ctx.tenant_id() {
            if active != target {
                warn!(%active, %target, "Cross-tenant write rejected");
                return Err(AppError::forbidden("Cross-tenant write rejected"));
            }
        }
        Ok(target)
    }

    /// Find every entity matching the filter within the active tenant.
    pub async fn find<T: TenantScoped>(&self, ctx: &TenantContext, filter: Filter) -> AppResult<Vec<T>> {
        let spec = self.collection::<T>()?;
        let filter = Self::scoped_filter(ctx, filter)?;
        self.store
            .find(&spec, &filter)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Find at most one entity matching the filter.
    pub async fn find_one<T: TenantScoped>(
        &self,
        ctx: &TenantContext,
        filter: Filter,
    ) -> AppResult<Option<T>> {
        Ok(self.find(ctx, filter).await?.into_iter().next())
    }

    /// Find an entity by id within the active tenant.
    pub async fn find_by_id<T: TenantScoped>(&self, ctx: &TenantContext, id: Uuid) -> AppResult<Option<T>> {
        self.find_one(ctx, Filter::new().eq(fields::ID, id.to_string()))
            .await
    }

    /// Insert a new entity. `new` is the stored shape without a revision;
    /// its `tenantId` may be absent, in which case it is filled in.
    pub async fn insert<T, D>(
        &self,
        ctx: &TenantContext,
        new: &D,
        explicit_tenant: Option<TenantId>,
    ) -> AppResult<T>
    where
        T: TenantScoped,
        D: Serialize + ?Sized,
    {
        let spec = self.collection::<T>()?;
        let mut doc = to_document(new)?;
        let doc_tenant = document_tenant(&doc)?;
        let tenant = Self::write_tenant(ctx, doc_tenant, explicit_tenant)?;
        doc.insert(fields::TENANT_ID.to_string(), Value::String(tenant.to_string()));

        let stored = self.store.insert(&spec, doc).await?;
        from_document(stored)
    }

    /// Replace an entity, compare-and-swap on its revision. The entity's
    /// tenant must be the active tenant and never changes.
    pub async fn replace<T: TenantScoped>(&self, ctx: &TenantContext, entity: &T) -> AppResult<T> {
        let spec = self.collection::<T>()?;
        let tenant = Self::write_tenant(ctx, entity.tenant_id(), None)?;
        let filter = Filter::new()
            .eq(fields::ID, entity.id().to_string())
            .eq(fields::TENANT_ID, tenant.to_string());
        let mut doc = to_document(entity)?;
        doc.insert(fields::TENANT_ID.to_string(), Value::String(tenant.to_string()));

        let stored = self
            .store
            .replace(&spec, &filter, doc, entity.revision())
            .await?;
        from_document(stored)
    }

    /// Atomically increment an integer field of one entity.
    pub async fn increment<T: TenantScoped>(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        field: &str,
        explicit_tenant: Option<TenantId>,
    ) -> AppResult<Option<T>> {
        let spec = self.collection::<T>()?;
        let tenant = Self::write_tenant(ctx, None, explicit_tenant)?;
        let filter = Filter::new()
            .eq(fields::ID, id.to_string())
            .eq(fields::TENANT_ID, tenant.to_string());
        self.store
            .increment(&spec, &filter, field)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Delete one entity by id within the target tenant.
    pub async fn delete<T: TenantScoped>(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        explicit_tenant: Option<TenantId>,
    ) -> AppResult<bool> {
        let spec = self.collection::<T>()?;
        let tenant = Self::write_tenant(ctx, None, explicit_tenant)?;
        let filter = Filter::new()
            .eq(fields::ID, id.to_string())
            .eq(fields::TENANT_ID, tenant.to_string());
        Ok(self.store.delete(&spec, &filter).await? > 0)
    }
}

fn to_document<D: Serialize + ?Sized>(value: &D) -> AppResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::internal("Entity did not serialize to a JSON object")),
    }
}

fn from_document<T: TenantScoped>(doc: Document) -> AppResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

fn document_tenant(doc: &Document) -> AppResult<Option<TenantId>> {
    match doc.get(fields::TENANT_ID) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::validation("Document has an invalid 'tenantId'")),
        Some(_) => Err(AppError::validation("Document has an invalid 'tenantId'")),
    }
}
