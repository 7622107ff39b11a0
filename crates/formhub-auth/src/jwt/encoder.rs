//! JWT credential creation with separate signing keys per credential type.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use formhub_core::config::AuthConfig;
use formhub_core::error::AppError;
use formhub_core::traits::Clock;
use formhub_entity::user::User;

use super::claims::{AccessClaims, RefreshClaims, TokenType};

/// Creates signed access and refresh credentials.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates an encoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
            refresh_ttl: Duration::days(config.refresh_ttl_days as i64),
            clock,
        }
    }

    /// Sign an access credential for `user`.
    pub fn encode_access(&self, user: &User) -> Result<(String, DateTime<Utc>), AppError> {
        let now = self.clock.now();
        let exp = now + self.access_ttl;
        let claims = AccessClaims {
            sub: user.id,
            tenant: user.tenant_id,
            is_system_admin: user.is_system_admin,
            is_tenant_admin: user.is_tenant_admin,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
            typ: TokenType::Access,
        };
        let token = encode(&Header::default(), &claims, &self.access_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;
        Ok((token, exp))
    }

    /// Sign a refresh credential embedding `token_version`.
    pub fn encode_refresh(
        &self,
        user: &User,
        token_version: u64,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = self.clock.now();
        let exp = now + self.refresh_ttl;
        let claims = RefreshClaims {
            sub: user.id,
            token_version,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
            typ: TokenType::Refresh,
        };
        let token = encode(&Header::default(), &claims, &self.refresh_key)
            .map_err(|e| AppError::internal(format!("Failed to encode refresh token: {e}")))?;
        Ok((token, exp))
    }
}
