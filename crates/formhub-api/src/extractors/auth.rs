//! Session extractors: pull the bearer credential, run the session guard,
//! and attach the principal.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use formhub_auth::session::{AuthenticatedPrincipal, GuardMode};
use formhub_auth::tenant::ResolvedTenant;
use formhub_core::error::AppError;
use formhub_service::RequestContext;

use super::tenant::MaybeTenant;
use crate::error::ApiError;
use crate::state::AppState;

/// Required principal (development bypass honoured).
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The authenticated principal.
    pub principal: AuthenticatedPrincipal,
    /// The tenant resolved from the request, if any.
    pub tenant: Option<ResolvedTenant>,
}

/// Required principal; the development bypass is never honoured.
#[derive(Debug, Clone)]
pub struct StrictAuthUser(pub AuthUser);

/// Principal when a valid credential is presented, anonymous otherwise.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser {
    /// The principal, if any.
    pub principal: Option<AuthenticatedPrincipal>,
    /// The tenant resolved from the request, if any.
    pub tenant: Option<ResolvedTenant>,
}

impl AuthUser {
    /// Service context for a tenant-scoped route.
    pub fn context(&self) -> Result<RequestContext, ApiError> {
        let tenant = self
            .tenant
            .clone()
            .ok_or_else(|| AppError::missing_tenant("This route needs a tenant key"))?;
        Ok(RequestContext::new(&self.principal, tenant))
    }
}

async fn authenticate(
    parts: &mut Parts,
    state: &AppState,
    mode: GuardMode,
) -> Result<(Option<AuthenticatedPrincipal>, Option<ResolvedTenant>), ApiError> {
    let MaybeTenant(tenant) = MaybeTenant::from_request_parts(parts, state).await?;

    let bearer = match Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state).await {
        Ok(header) => header.map(|TypedHeader(auth)| auth.token().to_string()),
        Err(_) if mode == GuardMode::Optional => None,
        Err(_) => return Err(AppError::unauthorized("Malformed Authorization header").into()),
    };

    let principal = state
        .session_guard
        .authenticate(mode, bearer.as_deref(), tenant.as_ref())
        .await?;
    Ok((principal, tenant))
}

fn required(
    found: (Option<AuthenticatedPrincipal>, Option<ResolvedTenant>),
) -> Result<AuthUser, ApiError> {
    match found {
        (Some(principal), tenant) => Ok(AuthUser { principal, tenant }),
        (None, _) => Err(AppError::unauthorized("Authentication required").into()),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        required(authenticate(parts, state, GuardMode::Required).await?)
    }
}

impl FromRequestParts<AppState> for StrictAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        required(authenticate(parts, state, GuardMode::Strict).await?).map(Self)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (principal, tenant) = authenticate(parts, state, GuardMode::Optional).await?;
        Ok(Self { principal, tenant })
    }
}
