//! Application builder: wires router, middleware, and state into an Axum app.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use formhub_auth::jwt::{JwtDecoder, JwtEncoder};
use formhub_auth::password::{PasswordHasher, PasswordValidator};
use formhub_auth::rbac::RbacResolver;
use formhub_auth::session::{SessionGuard, SessionManager};
use formhub_auth::tenant::TenantResolver;
use formhub_auth::token::TokenService;
use formhub_core::config::AppConfig;
use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::traits::{Clock, DocumentStore, SystemClock};
use formhub_database::repositories::{
    GroupRepository, TenantRepository, UserRepository, register_entities,
};
use formhub_database::{TenantIsolationGuard, connect_store};
use formhub_service::{GroupService, TenantService, UserAdminService};

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors, &state.config.tenant.header_name);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Wires the identity core and services over a document store.
pub fn build_state(
    config: AppConfig,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
) -> AppState {
    let config = Arc::new(config);

    // ── Step 1: Isolation guard and repositories ─────────────────
    let guard = TenantIsolationGuard::new(Arc::clone(&store));
    register_entities(&guard);
    let guard = Arc::new(guard);
    let user_repo = UserRepository::new(Arc::clone(&guard));
    let group_repo = GroupRepository::new(Arc::clone(&guard));
    let tenant_repo = TenantRepository::new(Arc::clone(&store));

    // ── Step 2: Identity core ────────────────────────────────────
    let tenant_resolver = Arc::new(TenantResolver::new(
        tenant_repo.clone(),
        &config.tenant,
        Arc::clone(&clock),
    ));
    let token_service = Arc::new(TokenService::new(
        JwtEncoder::new(&config.auth, Arc::clone(&clock)),
        JwtDecoder::new(&config.auth, Arc::clone(&clock)),
        user_repo.clone(),
        Arc::clone(&tenant_resolver),
    ));
    let session_guard = Arc::new(SessionGuard::new(
        Arc::clone(&token_service),
        user_repo.clone(),
        config.auth.dev_bypass,
    ));
    let hasher = PasswordHasher::new();
    let validator = PasswordValidator::new(&config.auth);
    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&token_service),
        Arc::clone(&tenant_resolver),
        user_repo.clone(),
        hasher.clone(),
        validator.clone(),
        Arc::clone(&clock),
    ));
    let rbac = Arc::new(RbacResolver::default());

    // ── Step 3: Services ─────────────────────────────────────────
    let group_service = Arc::new(GroupService::new(group_repo.clone(), Arc::clone(&rbac)));
    let user_service = Arc::new(UserAdminService::new(
        user_repo.clone(),
        group_repo,
        Arc::clone(&rbac),
        Arc::clone(&token_service),
        hasher.clone(),
        validator.clone(),
    ));
    let tenant_service = Arc::new(TenantService::new(
        tenant_repo,
        user_repo,
        Arc::clone(&rbac),
        hasher,
        validator,
        clock,
    ));

    AppState {
        config,
        store,
        tenant_resolver,
        token_service,
        session_guard,
        session_manager,
        rbac,
        group_service,
        user_service,
        tenant_service,
    }
}

/// Runs the FormHub server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting FormHub server...");

    if config.auth.dev_bypass {
        tracing::warn!(
            "auth.dev_bypass is enabled: every non-strict route runs as a system administrator"
        );
    }

    let store = connect_store(&config.database).await?;
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = build_state(config, store, Arc::new(SystemClock));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("FormHub server listening on {}", addr);

    let (signalled_tx, mut signalled_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(true);
        })
        .into_future();

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            let _ = signalled_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Shutdown grace period elapsed; dropping open connections");
        }
    }

    tracing::info!("FormHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
