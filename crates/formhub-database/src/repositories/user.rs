//! User repository implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use formhub_core::result::AppResult;
use formhub_core::types::{Filter, FilterField, TenantId, UserId};
use formhub_entity::user::model::normalize_email;
use formhub_entity::user::{CreateUser, User, UserStatus};

use crate::isolation::{TenantContext, TenantIsolationGuard};

/// Repository for users. Every call is scoped by the isolation guard.
#[derive(Debug, Clone)]
pub struct UserRepository {
    guard: Arc<TenantIsolationGuard>,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(guard: Arc<TenantIsolationGuard>) -> Self {
        Self { guard }
    }

    /// Insert a new user in the active (or explicit) tenant.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        input: CreateUser,
        now: DateTime<Utc>,
    ) -> AppResult<User> {
        let new = input.into_new(now)?;
        self.guard.insert(ctx, &new, None).await
    }

    /// Find a user by id.
    pub async fn find_by_id(&self, ctx: &TenantContext, id: UserId) -> AppResult<Option<User>> {
        self.guard.find_by_id(ctx, id.into_uuid()).await
    }

    /// Find a user by email (normalized before lookup).
    pub async fn find_by_email(&self, ctx: &TenantContext, email: &str) -> AppResult<Option<User>> {
        let email = normalize_email(email)?;
        self.guard
            .find_one(ctx, Filter::new().eq("email", email))
            .await
    }

    /// Every account with this email across all tenants.
    pub async fn find_by_email_any_tenant(&self, email: &str) -> AppResult<Vec<User>> {
        let email = normalize_email(email)?;
        self.guard
            .find(&TenantContext::unscoped_system(), Filter::new().eq("email", email))
            .await
    }

    /// Load a user by id without knowing its tenant.
    pub async fn find_by_id_any_tenant(&self, id: UserId) -> AppResult<Option<User>> {
        self.guard
            .find_by_id(&TenantContext::unscoped_system(), id.into_uuid())
            .await
    }

    /// List users in the active tenant, excluding soft-deleted ones.
    pub async fn list(&self, ctx: &TenantContext) -> AppResult<Vec<User>> {
        let filter = Filter::new().and(FilterField::ne("status", UserStatus::Deleted.as_str()));
        self.guard.find(ctx, filter).await
    }

    /// Persist an edited user, compare-and-swap on its revision.
    pub async fn save(&self, ctx: &TenantContext, user: &User) -> AppResult<User> {
        self.guard.replace(ctx, user).await
    }

    /// Atomically bump the user's token version, returning the updated user.
    pub async fn increment_token_version(
        &self,
        ctx: &TenantContext,
        id: UserId,
        tenant_id: TenantId,
    ) -> AppResult<Option<User>> {
        self.guard
            .increment(ctx, id.into_uuid(), User::TOKEN_VERSION_FIELD, Some(tenant_id))
            .await
    }
}
