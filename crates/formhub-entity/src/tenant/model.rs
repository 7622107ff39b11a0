//! Tenant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use formhub_core::AppError;
use formhub_core::traits::CollectionSpec;
use formhub_core::types::TenantId;

use super::status::TenantStatus;

/// An isolated customer organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Internal identifier; never appears in URLs.
    pub id: TenantId,
    /// Public, globally unique key used in URLs and headers.
    pub key: String,
    /// Human-readable name.
    pub display_name: String,
    /// Lifecycle status.
    pub status: TenantStatus,
    /// Compare-and-swap revision maintained by the store.
    #[serde(default)]
    pub revision: u64,
    /// When the tenant was created.
    pub created_at: DateTime<Utc>,
    /// When the tenant was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Collection holding tenant documents. Keys are unique globally.
    pub const COLLECTION: CollectionSpec = CollectionSpec::with_natural_key("tenants", "key");

    /// Whether the tenant is serving requests.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Data required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    /// Public key.
    pub key: String,
    /// Display name.
    pub display_name: String,
}

impl CreateTenant {
    /// Normalize and check the key: lowercase ASCII letters, digits and
    /// dashes, 2..=63 characters, not starting or ending with a dash.
    pub fn normalized_key(&self) -> Result<String, AppError> {
        normalize_key(&self.key)
    }

    /// Build the tenant record.
    pub fn into_tenant(self, now: DateTime<Utc>) -> Result<Tenant, AppError> {
        let key = self.normalized_key()?;
        let display_name = self.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(AppError::validation("Tenant display name is required"));
        }
        Ok(Tenant {
            id: TenantId::new(),
            key,
            display_name,
            status: TenantStatus::Active,
            revision: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Normalize a public key (tenant or group).
pub fn normalize_key(raw: &str) -> Result<String, AppError> {
    let key = raw.trim().to_lowercase();
    let valid_chars = key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if key.len() < 2 || key.len() > 63 || !valid_chars || key.starts_with('-') || key.ends_with('-')
    {
        return Err(AppError::validation(format!("Invalid key: '{raw}'")));
    }
    Ok(key)
}
