//! Auth handlers: register, login, refresh, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use formhub_auth::session::{LoginResult, PrincipalView};

use crate::dto::request::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse, RefreshResponse};
use crate::error::ApiError;
use crate::extractors::{ActiveTenant, StrictAuthUser, ValidatedJson};
use crate::state::AppState;

fn login_response(result: LoginResult) -> LoginResponse {
    LoginResponse {
        principal: result.principal,
        access_token: result.tokens.access_token,
        refresh_token: result.tokens.refresh_token,
        access_expires_at: result.tokens.access_expires_at,
        refresh_expires_at: result.tokens.refresh_expires_at,
    }
}

/// POST /api/t/{tenant_key}/auth/register
pub async fn register(
    State(state): State<AppState>,
    ActiveTenant(tenant): ActiveTenant,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PrincipalView>>), ApiError> {
    let user = state.session_manager.register(&tenant, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PrincipalView::from(&user))),
    ))
}

/// POST /api/auth/login
///
/// A `tenant_key` in the body wins; the tenant header is read only when the
/// body has none. Without either the email must be unique across tenants.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let tenant_key = req.tenant_key.clone().or_else(|| {
        headers
            .get(state.config.tenant.header_name.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    });
    let result = state
        .session_manager
        .login(tenant_key.as_deref(), &req.email, &req.password)
        .await?;
    Ok(Json(ApiResponse::ok(login_response(result))))
}

/// POST /api/t/{tenant_key}/auth/login
pub async fn login_in_tenant(
    State(state): State<AppState>,
    ActiveTenant(tenant): ActiveTenant,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let result = state
        .session_manager
        .login(Some(&tenant.key), &req.email, &req.password)
        .await?;
    Ok(Json(ApiResponse::ok(login_response(result))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let outcome = state
        .session_manager
        .refresh(&req.refresh_token, req.rotate)
        .await?;
    Ok(Json(ApiResponse::ok(RefreshResponse {
        principal: PrincipalView::from(&outcome.user),
        access_token: outcome.access_token,
        access_expires_at: outcome.access_expires_at,
        refresh_token: outcome.refresh_token,
        refresh_expires_at: outcome.refresh_expires_at,
    })))
}

/// POST /api/t/{tenant_key}/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    StrictAuthUser(auth): StrictAuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.session_manager.logout(&auth.principal).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out".to_string(),
    })))
}

/// GET /api/t/{tenant_key}/auth/me
pub async fn me(
    State(state): State<AppState>,
    StrictAuthUser(auth): StrictAuthUser,
) -> Json<ApiResponse<PrincipalView>> {
    Json(ApiResponse::ok(state.session_manager.me(&auth.principal)))
}
