//! Group repository implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use formhub_core::result::AppResult;
use formhub_core::types::{Filter, GroupId};
use formhub_entity::group::{CreateGroup, Group};

use crate::isolation::{TenantContext, TenantIsolationGuard};

/// Repository for groups. Every call is scoped by the isolation guard.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    guard: Arc<TenantIsolationGuard>,
}

impl GroupRepository {
    /// Create a new group repository.
    pub fn new(guard: Arc<TenantIsolationGuard>) -> Self {
        Self { guard }
    }

    /// Insert a new group in the active (or explicit) tenant.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        input: CreateGroup,
        now: DateTime<Utc>,
    ) -> AppResult<Group> {
        let new = input.into_new(now)?;
        self.guard.insert(ctx, &new, None).await
    }

    /// Find a group by id.
    pub async fn find_by_id(&self, ctx: &TenantContext, id: GroupId) -> AppResult<Option<Group>> {
        self.guard.find_by_id(ctx, id.into_uuid()).await
    }

    /// Find a group by key.
    pub async fn find_by_key(&self, ctx: &TenantContext, key: &str) -> AppResult<Option<Group>> {
        self.guard
            .find_one(ctx, Filter::new().eq("key", key.trim().to_lowercase()))
            .await
    }

    /// List groups in the active tenant.
    pub async fn list(&self, ctx: &TenantContext) -> AppResult<Vec<Group>> {
        self.guard.find(ctx, Filter::new()).await
    }

    /// Persist an edited group, compare-and-swap on its revision.
    pub async fn save(&self, ctx: &TenantContext, group: &Group) -> AppResult<Group> {
        self.guard.replace(ctx, group).await
    }
}
