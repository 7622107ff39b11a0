//! Session guard: turns a bearer credential into an authenticated principal.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::types::{TenantId, UserId};
use formhub_database::TenantContext;
use formhub_database::repositories::UserRepository;
use formhub_entity::user::{Memberships, User, UserStatus};

use super::principal::PrincipalView;
use crate::tenant::ResolvedTenant;
use crate::token::TokenService;

/// How strictly a route requires a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardMode {
    /// A valid, active principal is required.
    Required,
    /// Attach a principal when one is presented and valid; otherwise anonymous.
    Optional,
    /// As `Required`, and the development bypass is never honoured.
    Strict,
}

/// The principal attached to a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    /// The stored user, re-loaded for this request.
    pub user: User,
    /// Sanitized projection for responses.
    pub view: PrincipalView,
    /// Whether this principal was fabricated by the development bypass.
    pub bypass: bool,
}

impl AuthenticatedPrincipal {
    /// Wrap a loaded user.
    pub fn new(user: User, bypass: bool) -> Self {
        let view = PrincipalView::from(&user);
        Self { user, view, bypass }
    }
}

/// Validates bearer credentials and loads the principal.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    tokens: Arc<TokenService>,
    users: UserRepository,
    dev_bypass: bool,
}

impl SessionGuard {
    /// Create a guard. `dev_bypass` comes from `auth.dev_bypass`.
    pub fn new(tokens: Arc<TokenService>, users: UserRepository, dev_bypass: bool) -> Self {
        Self {
            tokens,
            users,
            dev_bypass,
        }
    }

    /// Authenticate a request.
    ///
    /// `tenant` is the tenant resolved from the request, if the route has
    /// one. Returns `None` only in [`GuardMode::Optional`].
    pub async fn authenticate(
        &self,
        mode: GuardMode,
        bearer: Option<&str>,
        tenant: Option<&ResolvedTenant>,
    ) -> AppResult<Option<AuthenticatedPrincipal>> {
        if self.dev_bypass && mode != GuardMode::Strict {
            debug!("Development bypass: fabricating system administrator");
            return Ok(Some(AuthenticatedPrincipal::new(bypass_user(tenant), true)));
        }

        match self.load(bearer, tenant).await {
            Ok(principal) => Ok(Some(principal)),
            Err(e) if mode == GuardMode::Optional && e.kind.is_authentication_failure() => {
                debug!(reason = %e.message, "Continuing anonymously");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn load(
        &self,
        bearer: Option<&str>,
        tenant: Option<&ResolvedTenant>,
    ) -> AppResult<AuthenticatedPrincipal> {
        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;
        let claims = self.tokens.decode_access(token)?;

        if let Some(tenant) = tenant {
            if claims.tenant != tenant.tenant_id && !claims.is_system_admin {
                warn!(
                    user_id = %claims.sub,
                    tenant = %tenant.key,
                    "Access credential presented to another tenant"
                );
                return Err(AppError::tenant_mismatch(
                    "Credential was issued for a different tenant",
                ));
            }
        }

        let ctx = TenantContext::tenant(claims.tenant);
        let user = self
            .users
            .find_by_id(&ctx, claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Principal no longer exists"))?;
        if !user.can_login() {
            return Err(AppError::unauthorized(format!("Account is {}", user.status)));
        }

        Ok(AuthenticatedPrincipal::new(user, false))
    }
}

/// The in-memory administrator used by the development bypass.
fn bypass_user(tenant: Option<&ResolvedTenant>) -> User {
    let now = Utc::now();
    User {
        id: UserId::from_uuid(Uuid::nil()),
        tenant_id: tenant
            .map(|t| t.tenant_id)
            .unwrap_or_else(|| TenantId::from_uuid(Uuid::nil())),
        email: "dev-bypass@localhost".into(),
        display_name: "Development Bypass".into(),
        password_hash: String::new(),
        status: UserStatus::Active,
        is_system_admin: true,
        is_tenant_admin: true,
        default_group_id: None,
        memberships: Memberships::empty(),
        token_version: 0,
        revision: 0,
        created_at: now,
        updated_at: now,
        last_login_at: None,
    }
}
