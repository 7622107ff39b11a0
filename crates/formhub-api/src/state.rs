//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use formhub_auth::rbac::RbacResolver;
use formhub_auth::session::{SessionGuard, SessionManager};
use formhub_auth::tenant::TenantResolver;
use formhub_auth::token::TokenService;
use formhub_core::config::AppConfig;
use formhub_core::traits::DocumentStore;
use formhub_service::{GroupService, TenantService, UserAdminService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Document store behind the isolation guard
    pub store: Arc<dyn DocumentStore>,

    // ── Identity core ────────────────────────────────────────
    /// Tenant key resolver with its TTL cache
    pub tenant_resolver: Arc<TenantResolver>,
    /// Credential issuance and rotation
    pub token_service: Arc<TokenService>,
    /// Per-request principal attachment
    pub session_guard: Arc<SessionGuard>,
    /// Register / login / refresh / logout flows
    pub session_manager: Arc<SessionManager>,
    /// Group-scoped permission resolution
    pub rbac: Arc<RbacResolver>,

    // ── Services ─────────────────────────────────────────────
    /// Group administration
    pub group_service: Arc<GroupService>,
    /// User administration
    pub user_service: Arc<UserAdminService>,
    /// Tenant lifecycle
    pub tenant_service: Arc<TenantService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("dev_bypass", &self.config.auth.dev_bypass)
            .finish_non_exhaustive()
    }
}
