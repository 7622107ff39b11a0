//! JWT credential validation.
//!
//! Expiry is checked against the injected clock rather than by
//! `jsonwebtoken`, so issuance and validation share one notion of time.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;

use formhub_core::config::AuthConfig;
use formhub_core::error::AppError;
use formhub_core::traits::Clock;

use super::claims::{AccessClaims, RefreshClaims, TokenType};

/// Why a credential failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Malformed,
    BadSignature,
    Expired,
    WrongType,
}

impl Rejection {
    fn message(&self) -> &'static str {
        match self {
            Self::Malformed => "Invalid token format",
            Self::BadSignature => "Invalid token signature",
            Self::Expired => "Token has expired",
            Self::WrongType => "Invalid token type",
        }
    }
}

/// Validates access and refresh credentials.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
    leeway_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
            leeway_seconds: config.leeway_seconds as i64,
            clock,
        }
    }

    /// Decode an access credential. Any failure is `Unauthorized`.
    pub fn decode_access(&self, token: &str) -> Result<AccessClaims, AppError> {
        let claims: AccessClaims = self
            .decode(token, &self.access_key)
            .map_err(|r| AppError::unauthorized(r.message()))?;
        self.check(claims.exp, claims.typ, TokenType::Access)
            .map_err(|r| AppError::unauthorized(r.message()))?;
        Ok(claims)
    }

    /// Decode a refresh credential. Any failure is `InvalidRefreshToken`.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, AppError> {
        let claims: RefreshClaims = self
            .decode(token, &self.refresh_key)
            .map_err(|r| AppError::invalid_refresh_token(r.message()))?;
        self.check(claims.exp, claims.typ, TokenType::Refresh)
            .map_err(|r| AppError::invalid_refresh_token(r.message()))?;
        Ok(claims)
    }

    fn decode<T: DeserializeOwned>(&self, token: &str, key: &DecodingKey) -> Result<T, Rejection> {
        decode::<T>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => Rejection::BadSignature,
                _ => Rejection::Malformed,
            })
    }

    fn check(&self, exp: i64, actual: TokenType, expected: TokenType) -> Result<(), Rejection> {
        if actual != expected {
            return Err(Rejection::WrongType);
        }
        if self.clock.now().timestamp() >= exp + self.leeway_seconds {
            return Err(Rejection::Expired);
        }
        Ok(())
    }
}
