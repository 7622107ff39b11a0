//! Group handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use formhub_core::types::GroupId;

use crate::dto::request::{CreateGroupRequest, ListGroupsQuery};
use crate::dto::response::{ApiResponse, GroupResponse, PermissionsResponse};
use crate::error::ApiError;
use crate::extractors::{ActiveTenant, AuthUser, MaybeAuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/t/{tenant_key}/groups
pub async fn list_groups(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListGroupsQuery>,
) -> Result<Json<ApiResponse<Vec<GroupResponse>>>, ApiError> {
    let groups = state
        .group_service
        .list(&auth.context()?, query.include_archived)
        .await?;
    Ok(Json(ApiResponse::ok(
        groups.into_iter().map(GroupResponse::from).collect(),
    )))
}

/// POST /api/t/{tenant_key}/groups
pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GroupResponse>>), ApiError> {
    let group = state
        .group_service
        .create(&auth.context()?, req.key, req.name)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(group.into()))))
}

/// POST /api/t/{tenant_key}/groups/{group_id}/archive
pub async fn archive_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((_tenant_key, group_id)): Path<(String, GroupId)>,
) -> Result<Json<ApiResponse<GroupResponse>>, ApiError> {
    let group = state
        .group_service
        .archive(&auth.context()?, group_id)
        .await?;
    Ok(Json(ApiResponse::ok(group.into())))
}

/// GET /api/t/{tenant_key}/groups/{group_id}/permissions
///
/// Anonymous callers get an empty set rather than an error.
pub async fn group_permissions(
    State(state): State<AppState>,
    ActiveTenant(tenant): ActiveTenant,
    auth: MaybeAuthUser,
    Path((_tenant_key, group_id)): Path<(String, GroupId)>,
) -> Result<Json<ApiResponse<PermissionsResponse>>, ApiError> {
    let permissions = state
        .group_service
        .effective_permissions(&tenant, auth.principal.as_ref(), group_id)
        .await?;
    Ok(Json(ApiResponse::ok(PermissionsResponse {
        group_id,
        authenticated: auth.principal.is_some(),
        permissions: permissions.into_iter().collect(),
    })))
}
