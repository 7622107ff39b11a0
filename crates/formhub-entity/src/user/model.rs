//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use formhub_core::AppError;
use formhub_core::traits::{CollectionSpec, TenantScoped};
use formhub_core::types::{GroupId, TenantId, UserId};

use super::membership::Memberships;
use super::status::UserStatus;

/// A principal belonging to exactly one tenant.
///
/// The stored form includes the password hash and token version; never
/// return this type from an API. Use the sanitized principal view instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Owning tenant; immutable after creation.
    pub tenant_id: TenantId,
    /// Lower-cased email, unique within the tenant.
    pub email: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Account status.
    pub status: UserStatus,
    /// Holds every permission in every tenant.
    #[serde(default)]
    pub is_system_admin: bool,
    /// Holds every tenant-scoped permission in the owning tenant.
    #[serde(default)]
    pub is_tenant_admin: bool,
    /// Preferred group; always one of the user's memberships.
    #[serde(default)]
    pub default_group_id: Option<GroupId>,
    /// Group memberships with role keys.
    #[serde(default)]
    pub memberships: Memberships,
    /// Refresh credentials embedding another version are invalid.
    #[serde(default)]
    pub token_version: u64,
    /// Compare-and-swap revision maintained by the store.
    #[serde(default)]
    pub revision: u64,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Name of the stored token version field.
    pub const TOKEN_VERSION_FIELD: &'static str = "tokenVersion";

    /// Check if the user can authenticate right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// Replace the membership list. A default group that is no longer a
    /// membership is cleared.
    pub fn replace_memberships(&mut self, memberships: Memberships) {
        if self.default_group_id.is_some_and(|g| !memberships.contains(g)) {
            self.default_group_id = None;
        }
        self.memberships = memberships;
    }

    /// Set or clear the default group.
    pub fn set_default_group(&mut self, group_id: Option<GroupId>) -> Result<(), AppError> {
        if let Some(group) = group_id.filter(|g| !self.memberships.contains(*g)) {
            return Err(AppError::validation(format!(
                "Default group {group} is not one of the user's memberships"
            )));
        }
        self.default_group_id = group_id;
        Ok(())
    }
}

impl TenantScoped for User {
    const COLLECTION: CollectionSpec = CollectionSpec::with_natural_key("users", "email");

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

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Explicit owning tenant; usually left to the active tenant.
    pub tenant_id: Option<TenantId>,
    /// Email address (normalized on build).
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Tenant administrator flag.
    pub is_tenant_admin: bool,
    /// System administrator flag.
    pub is_system_admin: bool,
    /// Initial memberships.
    pub memberships: Memberships,
}

/// Stored shape of a new user before a tenant is assigned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Fresh identifier.
    pub id: UserId,
    /// Explicit owning tenant, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    /// Normalized email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Password hash.
    pub password_hash: String,
    /// Initial status.
    pub status: UserStatus,
    /// System administrator flag.
    pub is_system_admin: bool,
    /// Tenant administrator flag.
    pub is_tenant_admin: bool,
    /// No default group at creation.
    pub default_group_id: Option<GroupId>,
    /// Initial memberships.
    pub memberships: Memberships,
    /// Starts at zero.
    pub token_version: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Update time.
    pub updated_at: DateTime<Utc>,
    /// Never logged in yet.
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Trim and lower-case an email address, rejecting obviously invalid input.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::validation(format!("Invalid email address: '{raw}'"))),
    }
}

impl CreateUser {
    /// Validate and build the document to insert.
    pub fn into_new(self, now: DateTime<Utc>) -> Result<NewUser, AppError> {
        let email = normalize_email(&self.email)?;
        let display_name = match self.display_name.trim() {
            "" => email.clone(),
            name => name.to_string(),
        };
        Ok(NewUser {
            id: UserId::new(),
            tenant_id: self.tenant_id,
            email,
            display_name,
            password_hash: self.password_hash,
            status: UserStatus::Active,
            is_system_admin: self.is_system_admin,
            is_tenant_admin: self.is_tenant_admin,
            default_group_id: None,
            memberships: self.memberships,
            token_version: 0,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Membership;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            tenant_id: TenantId::new(),
            email: "ana@acme.io".into(),
            display_name: "Ana".into(),
            password_hash: "hash".into(),
            status: UserStatus::Active,
            is_system_admin: false,
            is_tenant_admin: false,
            default_group_id: None,
            memberships: Memberships::empty(),
            token_version: 0,
            revision: 1,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Acme.IO ").expect("valid"), "ana@acme.io");
        assert!(normalize_email("ana").is_err());
        assert!(normalize_email("@acme.io").is_err());
    }

    #[test]
    fn test_replacing_memberships_clears_stale_default() {
        let ops = GroupId::new();
        let hr = GroupId::new();
        let mut user = user();
        user.replace_memberships(
            Memberships::new(vec![Membership::new(ops, ["Viewer"])]).expect("valid"),
        );
        user.set_default_group(Some(ops)).expect("member");

        user.replace_memberships(
            Memberships::new(vec![Membership::new(hr, ["Viewer"])]).expect("valid"),
        );
        assert_eq!(user.default_group_id, None);
    }

    #[test]
    fn test_default_group_must_be_member() {
        let mut user = user();
        let err = user
            .set_default_group(Some(GroupId::new()))
            .expect_err("not a member");
        assert!(err.is(formhub_core::error::ErrorKind::Validation));
    }

    #[test]
    fn test_stored_form_round_trips() {
        let user = user();
        let json = serde_json::to_value(&user).expect("serialize");
        assert_eq!(json["tokenVersion"], 0);
        assert_eq!(json["tenantId"], user.tenant_id.to_string());
        let back: User = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back.id, user.id);
    }
}
