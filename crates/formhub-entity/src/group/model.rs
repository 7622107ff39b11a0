//! Group entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use formhub_core::AppError;
use formhub_core::traits::{CollectionSpec, TenantScoped};
use formhub_core::types::{GroupId, TenantId};

use crate::tenant::model::normalize_key;

/// Status of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    /// The group is in use.
    Active,
    /// The group is retired; memberships remain but it is hidden from listings.
    Archived,
}

/// A unit of collaboration inside a tenant. Roles are assigned per group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Owning tenant; immutable after creation.
    pub tenant_id: TenantId,
    /// Key unique within the tenant.
    pub key: String,
    /// Human-readable name.
    pub name: String,
    /// Group status.
    pub status: GroupStatus,
    /// Compare-and-swap revision maintained by the store.
    #[serde(default)]
    pub revision: u64,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
    /// When the group was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Whether the group is active.
    pub fn is_active(&self) -> bool {
        matches!(self.status, GroupStatus::Active)
    }
}

impl TenantScoped for Group {
    const COLLECTION: CollectionSpec = CollectionSpec::with_natural_key("groups", "key");

    fn id(&self) -> Uuid {
        self.id.into_uuid()
    }

    fn tenant_id(&self) -> Option<TenantId> {
        Some(self.tenant_id)
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// Data required to create a new group.
///
/// `tenant_id` is normally left empty and filled from the active tenant by
/// the isolation guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    /// Explicit owning tenant, if the caller knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    /// Key unique within the tenant.
    pub key: String,
    /// Human-readable name.
    pub name: String,
}

/// Stored shape of a new group before a tenant is assigned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    /// Fresh identifier.
    pub id: GroupId,
    /// Explicit owning tenant, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    /// Normalized key.
    pub key: String,
    /// Trimmed name.
    pub name: String,
    /// Initial status.
    pub status: GroupStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Update time.
    pub updated_at: DateTime<Utc>,
}

impl CreateGroup {
    /// Validate and build the document to insert.
    pub fn into_new(self, now: DateTime<Utc>) -> Result<NewGroup, AppError> {
        let key = normalize_key(&self.key)?;
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Group name is required"));
        }
        Ok(NewGroup {
            id: GroupId::new(),
            tenant_id: self.tenant_id,
            key,
            name,
            status: GroupStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }
}
