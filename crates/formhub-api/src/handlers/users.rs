//! Tenant user administration handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use formhub_core::types::UserId;

use crate::dto::request::{
    InviteUserRequest, ReplaceMembershipsRequest, SetDefaultGroupRequest, SetUserStatusRequest,
};
use crate::dto::response::{ApiResponse, RevokeResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/t/{tenant_key}/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let users = state.user_service.list(&auth.context()?).await?;
    Ok(Json(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/t/{tenant_key}/users
pub async fn invite_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<InviteUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let user = state
        .user_service
        .invite(&auth.context()?, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// PUT /api/t/{tenant_key}/users/{user_id}/memberships
pub async fn replace_memberships(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((_tenant_key, user_id)): Path<(String, UserId)>,
    ValidatedJson(req): ValidatedJson<ReplaceMembershipsRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state
        .user_service
        .replace_memberships(
            &auth.context()?,
            user_id,
            req.memberships.into_iter().map(Into::into).collect(),
            req.expected_revision,
        )
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/t/{tenant_key}/users/{user_id}/status
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((_tenant_key, user_id)): Path<(String, UserId)>,
    ValidatedJson(req): ValidatedJson<SetUserStatusRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state
        .user_service
        .set_status(&auth.context()?, user_id, req.status)
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/t/{tenant_key}/users/{user_id}/default-group
pub async fn set_default_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((_tenant_key, user_id)): Path<(String, UserId)>,
    ValidatedJson(req): ValidatedJson<SetDefaultGroupRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state
        .user_service
        .set_default_group(&auth.context()?, user_id, req.group_id)
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// POST /api/t/{tenant_key}/users/{user_id}/revoke-sessions
pub async fn revoke_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((_tenant_key, user_id)): Path<(String, UserId)>,
) -> Result<Json<ApiResponse<RevokeResponse>>, ApiError> {
    let token_version = state
        .user_service
        .revoke_sessions(&auth.context()?, user_id)
        .await?;
    Ok(Json(ApiResponse::ok(RevokeResponse { token_version })))
}
