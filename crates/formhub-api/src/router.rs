//! Route definitions for the FormHub HTTP API.
//!
//! All routes are mounted under `/api`. Tenant-scoped routes live under
//! `/t/{tenant_key}`; the auth routes also exist without the prefix for
//! clients that send the tenant header instead.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .nest("/t/{tenant_key}", tenant_routes())
        .merge(admin_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Auth endpoints addressed by header or body tenant key.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Everything under `/t/{tenant_key}`.
fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login_in_tenant))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/groups",
            get(handlers::groups::list_groups).post(handlers::groups::create_group),
        )
        .route(
            "/groups/{group_id}/permissions",
            get(handlers::groups::group_permissions),
        )
        .route(
            "/groups/{group_id}/archive",
            post(handlers::groups::archive_group),
        )
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::invite_user),
        )
        .route(
            "/users/{user_id}/memberships",
            put(handlers::users::replace_memberships),
        )
        .route("/users/{user_id}/status", put(handlers::users::set_status))
        .route(
            "/users/{user_id}/default-group",
            put(handlers::users::set_default_group),
        )
        .route(
            "/users/{user_id}/revoke-sessions",
            post(handlers::users::revoke_sessions),
        )
}

/// System administration.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/tenants",
            get(handlers::admin::list_tenants).post(handlers::admin::create_tenant),
        )
        .route(
            "/admin/tenants/{key}/status",
            put(handlers::admin::set_tenant_status),
        )
}

/// Liveness.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
