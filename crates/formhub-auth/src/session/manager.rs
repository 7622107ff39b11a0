//! Session lifecycle manager: register, login, refresh, logout.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use formhub_core::error::{AppError, ErrorKind};
use formhub_core::result::AppResult;
use formhub_core::traits::Clock;
use formhub_database::TenantContext;
use formhub_database::repositories::UserRepository;
use formhub_entity::user::{CreateUser, Memberships, User};

use super::guard::AuthenticatedPrincipal;
use super::principal::PrincipalView;
use crate::password::{PasswordHasher, PasswordValidator};
use crate::tenant::{ResolvedTenant, TenantResolver};
use crate::token::{RefreshOutcome, TokenPair, TokenService};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Self-service registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    /// Email address.
    pub email: String,
    /// Plaintext password (checked against the password policy).
    pub password: String,
    /// Display name; defaults to the email.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The authenticated user.
    pub user: User,
    /// Sanitized view of the user.
    pub principal: PrincipalView,
    /// Issued credentials.
    pub tokens: TokenPair,
}

/// Runs the credential flows on top of the token service.
#[derive(Clone)]
pub struct SessionManager {
    tokens: Arc<TokenService>,
    tenants: Arc<TenantResolver>,
    users: UserRepository,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("validator", &self.validator)
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager.
    pub fn new(
        tokens: Arc<TokenService>,
        tenants: Arc<TenantResolver>,
        users: UserRepository,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tokens,
            tenants,
            users,
            hasher,
            validator,
            clock,
        }
    }

    /// Register a new member of `tenant`.
    pub async fn register(&self, tenant: &ResolvedTenant, input: RegisterInput) -> AppResult<User> {
        let display_name = input.display_name.unwrap_or_default();
        self.validator
            .validate(&input.password, &[input.email.as_str(), display_name.as_str()])?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let ctx = TenantContext::tenant(tenant.tenant_id);
        let user = self
            .users
            .create(
                &ctx,
                CreateUser {
                    tenant_id: None,
                    email: input.email,
                    display_name,
                    password_hash,
                    is_tenant_admin: false,
                    is_system_admin: false,
                    memberships: Memberships::empty(),
                },
                self.clock.now(),
            )
            .await?;
        info!(user_id = %user.id, tenant = %tenant.key, "User registered");
        Ok(user)
    }

    /// Authenticate with email and password.
    ///
    /// With a tenant key, the account must live in that tenant: an account
    /// that only exists (with this password) in another tenant fails with
    /// `TenantMismatch`, a wrong password with `Unauthorized`. Without a key
    /// the email must identify exactly one account, else `MissingTenant`.
    pub async fn login(
        &self,
        tenant_key: Option<&str>,
        email: &str,
        password: &str,
    ) -> AppResult<LoginResult> {
        let tenant_key = tenant_key.map(str::trim).filter(|k| !k.is_empty());
        let user = match tenant_key {
            Some(key) => self.login_in_tenant(key, email, password).await?,
            None => self.login_anywhere(email, password).await?,
        };

        if !user.can_login() {
            warn!(user_id = %user.id, status = %user.status, "Login for inactive account");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let user = self.record_login(user).await;
        let tokens = self.tokens.issue_tokens(&user)?;
        info!(user_id = %user.id, tenant_id = %user.tenant_id, "Login succeeded");
        Ok(LoginResult {
            principal: PrincipalView::from(&user),
            user,
            tokens,
        })
    }

    async fn login_in_tenant(&self, key: &str, email: &str, password: &str) -> AppResult<User> {
        let tenant = self.tenants.resolve(key).await?;
        let ctx = TenantContext::tenant(tenant.tenant_id);

        match self.users.find_by_email(&ctx, email).await {
            Ok(Some(user)) => {
                self.check_password(&user, password)?;
                Ok(user)
            }
            Ok(None) => {
                let elsewhere = self.users.find_by_email_any_tenant(email).await?;
                let mut matched = false;
                for other in &elsewhere {
                    if self.hasher.verify_password(password, &other.password_hash)? {
                        matched = true;
                        break;
                    }
                }
                if elsewhere.is_empty() {
                    self.hasher.burn_verification(password);
                }
                if matched {
                    warn!(tenant = %tenant.key, "Login against the wrong tenant");
                    return Err(AppError::tenant_mismatch(
                        "This account belongs to a different tenant",
                    ));
                }
                Err(AppError::unauthorized(INVALID_CREDENTIALS))
            }
            Err(e) if e.is(ErrorKind::Validation) => Err(AppError::unauthorized(INVALID_CREDENTIALS)),
            Err(e) => Err(e),
        }
    }

    /// Key-less login. Every failure before a password match is the same
    /// `Unauthorized`, so the response never reveals whether an email is
    /// registered, in how many tenants, or whether its tenant is suspended.
    async fn login_anywhere(&self, email: &str, password: &str) -> AppResult<User> {
        let candidates = match self.users.find_by_email_any_tenant(email).await {
            Ok(found) => found,
            Err(e) if e.is(ErrorKind::Validation) => Vec::new(),
            Err(e) => return Err(e),
        };
        if candidates.is_empty() {
            self.hasher.burn_verification(password);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let ambiguous = candidates.len() > 1;
        let mut matched = None;
        for candidate in candidates {
            if self.hasher.verify_password(password, &candidate.password_hash)? {
                matched = Some(candidate);
                break;
            }
        }
        let Some(user) = matched else {
            warn!("Wrong password for key-less login");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if ambiguous {
            return Err(AppError::missing_tenant(
                "This email is registered in several tenants; supply a tenant key",
            ));
        }
        self.tenants.ensure_active(user.tenant_id).await?;
        Ok(user)
    }

    fn check_password(&self, user: &User, password: &str) -> AppResult<()> {
        if self.hasher.verify_password(password, &user.password_hash)? {
            Ok(())
        } else {
            warn!(user_id = %user.id, "Wrong password");
            Err(AppError::unauthorized(INVALID_CREDENTIALS))
        }
    }

    /// Stamp `last_login_at`. A concurrent edit wins; the login proceeds.
    async fn record_login(&self, user: User) -> User {
        let mut stamped = user.clone();
        let now = self.clock.now();
        stamped.last_login_at = Some(now);
        stamped.updated_at = now;
        let ctx = TenantContext::tenant(user.tenant_id);
        match self.users.save(&ctx, &stamped).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Could not record login time");
                user
            }
        }
    }

    /// Exchange a refresh credential, optionally rotating it.
    pub async fn refresh(&self, refresh_token: &str, rotate: bool) -> AppResult<RefreshOutcome> {
        self.tokens.rotate_refresh_token(refresh_token, rotate).await
    }

    /// Revoke every refresh credential of the caller.
    pub async fn logout(&self, principal: &AuthenticatedPrincipal) -> AppResult<()> {
        self.tokens.invalidate_all(principal.user.id).await?;
        info!(user_id = %principal.user.id, "Logged out");
        Ok(())
    }

    /// The caller's sanitized view.
    pub fn me(&self, principal: &AuthenticatedPrincipal) -> PrincipalView {
        principal.view.clone()
    }
}
