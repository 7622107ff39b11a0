//! Tenant extractors: resolve the tenant key from the path or the legacy
//! header.

use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::request::Parts;

use formhub_auth::tenant::ResolvedTenant;
use formhub_core::error::{AppError, ErrorKind};

use crate::error::ApiError;
use crate::state::AppState;

/// Path parameter carrying the tenant key.
pub const TENANT_PATH_PARAM: &str = "tenant_key";

/// The active, resolved tenant of the request. Rejects with
/// `MissingTenant`, `TenantNotFound`, or `TenantSuspended`.
#[derive(Debug, Clone)]
pub struct ActiveTenant(pub ResolvedTenant);

/// The tenant of the request, if one was supplied. A supplied key that is
/// unknown or suspended still rejects.
#[derive(Debug, Clone)]
pub struct MaybeTenant(pub Option<ResolvedTenant>);

/// The raw tenant key: path segment first, then the configured header.
async fn tenant_key(parts: &mut Parts, state: &AppState) -> Option<String> {
    if let Ok(params) = RawPathParams::from_request_parts(parts, state).await {
        let from_path = params
            .iter()
            .find(|(name, _)| *name == TENANT_PATH_PARAM)
            .map(|(_, value)| value.to_string());
        if from_path.is_some() {
            return from_path;
        }
    }
    parts
        .headers
        .get(state.config.tenant.header_name.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Resolve once per request; later extractors reuse the result.
pub(crate) async fn resolve_tenant(
    parts: &mut Parts,
    state: &AppState,
) -> Result<ResolvedTenant, AppError> {
    if let Some(tenant) = parts.extensions.get::<ResolvedTenant>() {
        return Ok(tenant.clone());
    }
    let key = tenant_key(parts, state).await.unwrap_or_default();
    let tenant = state.tenant_resolver.resolve(&key).await?;
    parts.extensions.insert(tenant.clone());
    Ok(tenant)
}

impl FromRequestParts<AppState> for ActiveTenant {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_tenant(parts, state).await?))
    }
}

impl FromRequestParts<AppState> for MaybeTenant {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve_tenant(parts, state).await {
            Ok(tenant) => Ok(Self(Some(tenant))),
            Err(e) if e.is(ErrorKind::MissingTenant) => Ok(Self(None)),
            Err(e) => Err(e.into()),
        }
    }
}
