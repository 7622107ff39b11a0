//! Request context carrying the acting principal and the resolved tenant.

use chrono::{DateTime, Utc};

use formhub_auth::session::AuthenticatedPrincipal;
use formhub_auth::tenant::ResolvedTenant;
use formhub_core::types::TenantId;
use formhub_database::TenantContext;
use formhub_entity::user::User;

/// Who is acting, and in which tenant.
///
/// Built by the HTTP layer once the session guard has attached a
/// principal, and passed into every service method.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The acting principal.
    pub actor: User,
    /// The tenant the request targets.
    pub tenant: ResolvedTenant,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a request context.
    pub fn new(principal: &AuthenticatedPrincipal, tenant: ResolvedTenant) -> Self {
        Self {
            actor: principal.user.clone(),
            tenant,
            request_time: Utc::now(),
        }
    }

    /// The target tenant id.
    pub fn tenant_id(&self) -> TenantId {
        self.tenant.tenant_id
    }

    /// Storage scope for this request.
    pub fn scope(&self) -> TenantContext {
        TenantContext::tenant(self.tenant.tenant_id)
    }
}
