//! Token service.
//!
//! Credentials are stateless. The only server-side state is each user's
//! `token_version`: a refresh credential is valid iff its embedded version
//! equals the current one, so bumping the counter revokes every outstanding
//! refresh credential of that user at once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::types::UserId;
use formhub_database::TenantContext;
use formhub_database::repositories::UserRepository;
use formhub_entity::user::User;

use crate::jwt::{AccessClaims, JwtDecoder, JwtEncoder};
use crate::tenant::TenantResolver;

/// A freshly issued access and refresh credential.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    /// Short-lived access credential.
    pub access_token: String,
    /// Long-lived refresh credential.
    pub refresh_token: String,
    /// Access credential expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh credential expiry.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Result of exchanging a refresh credential.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// The principal, as of the exchange.
    pub user: User,
    /// New access credential.
    pub access_token: String,
    /// Access credential expiry.
    pub access_expires_at: DateTime<Utc>,
    /// New refresh credential, only on a hard rotation.
    pub refresh_token: Option<String>,
    /// New refresh credential expiry, only on a hard rotation.
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

/// Issues, validates, rotates, and revokes credentials.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    users: UserRepository,
    tenants: Arc<TenantResolver>,
}

impl TokenService {
    /// Create a token service.
    pub fn new(
        encoder: JwtEncoder,
        decoder: JwtDecoder,
        users: UserRepository,
        tenants: Arc<TenantResolver>,
    ) -> Self {
        Self {
            encoder,
            decoder,
            users,
            tenants,
        }
    }

    /// Issue an access and refresh credential for `user` at its current
    /// token version.
    pub fn issue_tokens(&self, user: &User) -> AppResult<TokenPair> {
        let (access_token, access_expires_at) = self.encoder.encode_access(user)?;
        let (refresh_token, refresh_expires_at) =
            self.encoder.encode_refresh(user, user.token_version)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Validate an access credential.
    pub fn decode_access(&self, token: &str) -> AppResult<AccessClaims> {
        self.decoder.decode_access(token)
    }

    /// Exchange a refresh credential for a new access credential.
    ///
    /// With `rotate`, the user's token version is bumped and a new refresh
    /// credential embedding it is returned; the credential just presented
    /// (and every other one for this user) stops working.
    pub async fn rotate_refresh_token(&self, token: &str, rotate: bool) -> AppResult<RefreshOutcome> {
        let claims = self.decoder.decode_refresh(token)?;

        let user = self
            .users
            .find_by_id_any_tenant(claims.sub)
            .await?
            .filter(User::can_login)
            .ok_or_else(|| AppError::invalid_refresh_token("Unknown or inactive principal"))?;

        if claims.token_version != user.token_version {
            warn!(user_id = %user.id, "Refresh credential with stale token version");
            return Err(AppError::invalid_refresh_token("Refresh token has been revoked"));
        }

        self.tenants.ensure_active(user.tenant_id).await?;

        let (user, refresh) = if rotate {
            let ctx = TenantContext::tenant(user.tenant_id);
            let bumped = self
                .users
                .increment_token_version(&ctx, user.id, user.tenant_id)
                .await?
                .ok_or_else(|| AppError::invalid_refresh_token("Unknown or inactive principal"))?;
            let refresh = self.encoder.encode_refresh(&bumped, bumped.token_version)?;
            info!(user_id = %bumped.id, token_version = bumped.token_version, "Refresh credential rotated");
            (bumped, Some(refresh))
        } else {
            (user, None)
        };

        let (access_token, access_expires_at) = self.encoder.encode_access(&user)?;
        let (refresh_token, refresh_expires_at) = refresh.unzip();
        Ok(RefreshOutcome {
            user,
            access_token,
            access_expires_at,
            refresh_token,
            refresh_expires_at,
        })
    }

    /// Revoke every refresh credential of a user. Returns the new version.
    pub async fn invalidate_all(&self, user_id: UserId) -> AppResult<u64> {
        let user = self
            .users
            .find_by_id_any_tenant(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        let ctx = TenantContext::tenant(user.tenant_id);
        let bumped = self
            .users
            .increment_token_version(&ctx, user.id, user.tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        info!(user_id = %user_id, token_version = bumped.token_version, "All refresh credentials revoked");
        Ok(bumped.token_version)
    }
}
