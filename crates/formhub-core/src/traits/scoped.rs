//! Marker trait for entities stored through the tenant isolation guard.

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::store::CollectionSpec;
use crate::types::TenantId;

/// An entity that belongs to exactly one tenant.
///
/// Implementors serialize with a top-level `tenantId` field, an `id` field
/// and a `revision` counter; the isolation guard relies on those names.
pub trait TenantScoped: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The collection this entity is stored in.
    const COLLECTION: CollectionSpec;

    /// The entity's primary identifier.
    fn id(&self) -> Uuid;

    /// The owning tenant, if one has been assigned yet.
    fn tenant_id(&self) -> Option<TenantId>;

    /// The stored revision, used for compare-and-swap on replace.
    fn revision(&self) -> u64;
}
