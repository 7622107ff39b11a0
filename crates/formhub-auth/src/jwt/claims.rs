//! JWT claims for access and refresh credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use formhub_core::types::{TenantId, UserId};

/// Distinguishes access credentials from refresh credentials.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived credential presented on every request.
    Access,
    /// Long-lived credential exchanged for new access credentials.
    Refresh,
}

/// Claims embedded in every access credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id.
    pub sub: UserId,
    /// The user's tenant.
    pub tenant: TenantId,
    /// System administrator flag at issuance.
    pub is_system_admin: bool,
    /// Tenant administrator flag at issuance.
    pub is_tenant_admin: bool,
    /// Issuer.
    pub iss: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Unique credential id.
    pub jti: Uuid,
    /// Always [`TokenType::Access`].
    pub typ: TokenType,
}

/// Claims embedded in every refresh credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject: the user id.
    pub sub: UserId,
    /// The user's token version at issuance.
    pub token_version: u64,
    /// Issuer.
    pub iss: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Unique credential id.
    pub jti: Uuid,
    /// Always [`TokenType::Refresh`].
    pub typ: TokenType,
}

/// Convert a JWT `exp` into an instant.
pub(crate) fn instant(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl AccessClaims {
    /// Expiry as an instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        instant(self.exp)
    }
}

impl RefreshClaims {
    /// Expiry as an instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        instant(self.exp)
    }
}
