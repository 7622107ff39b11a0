//! System administration handlers: tenant lifecycle.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::dto::request::{CreateTenantRequest, SetTenantStatusRequest};
use crate::dto::response::{ApiResponse, TenantResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/admin/tenants
pub async fn list_tenants(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<TenantResponse>>>, ApiError> {
    state.tenant_service.authorize(&auth.principal.user)?;
    let tenants = state.tenant_service.list().await?;
    Ok(Json(ApiResponse::ok(
        tenants.into_iter().map(TenantResponse::from).collect(),
    )))
}

/// POST /api/admin/tenants
pub async fn create_tenant(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTenantRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TenantResponse>>), ApiError> {
    state.tenant_service.authorize(&auth.principal.user)?;
    let tenant = state.tenant_service.create(req.into()).await?;
    tracing::info!(tenant = %tenant.key, actor = %auth.principal.user.id, "Tenant created over HTTP");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(tenant.into()))))
}

/// PUT /api/admin/tenants/{key}/status
pub async fn set_tenant_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    ValidatedJson(req): ValidatedJson<SetTenantStatusRequest>,
) -> Result<Json<ApiResponse<TenantResponse>>, ApiError> {
    state.tenant_service.authorize(&auth.principal.user)?;
    let tenant = state.tenant_service.set_status(&key, req.status).await?;
    Ok(Json(ApiResponse::ok(tenant.into())))
}
