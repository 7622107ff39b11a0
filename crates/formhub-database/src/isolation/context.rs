//! Request-scoped tenant context.

use tracing::debug;

use formhub_core::types::TenantId;

/// The tenant a unit of work runs under. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: Option<TenantId>,
    unscoped: bool,
}

impl TenantContext {
    /// Work scoped to one tenant.
    pub fn tenant(tenant_id: TenantId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            unscoped: false,
        }
    }

    /// No tenant. Every tenant-scoped operation fails with `TenantRequired`.
    pub fn none() -> Self {
        Self {
            tenant_id: None,
            unscoped: false,
        }
    }

    /// Explicit escape hatch: reads span every tenant. Writes still need a
    /// tenant from the document or the caller.
    pub fn unscoped_system() -> Self {
        debug!("Entering unscoped system tenant context");
        Self {
            tenant_id: None,
            unscoped: true,
        }
    }

    /// The active tenant, if any.
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Whether this is the system escape hatch.
    pub fn is_unscoped_system(&self) -> bool {
        self.unscoped
    }
}
