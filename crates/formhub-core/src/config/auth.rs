//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Credential, password, and session-guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access credentials (HS256).
    #[serde(default = "default_access_secret")]
    pub access_secret: String,
    /// HMAC secret for refresh credentials (HS256). Kept separate so an
    /// access credential can never be replayed as a refresh credential.
    #[serde(default = "default_refresh_secret")]
    pub refresh_secret: String,
    /// Issuer (`iss` claim).
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access credential TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh credential TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Clock-skew leeway in seconds applied when validating expiry.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Minimum password length for new passwords.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Development bypass: fabricate an administrator for non-strict routes.
    #[serde(default)]
    pub dev_bypass: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: default_access_secret(),
            refresh_secret: default_refresh_secret(),
            issuer: default_issuer(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            leeway_seconds: default_leeway(),
            password_min_length: default_password_min(),
            dev_bypass: false,
        }
    }
}

impl AuthConfig {
    /// Reject configurations that would make credentials interchangeable.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(AppError::configuration("Signing secrets must not be empty"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(AppError::configuration(
                "access_secret and refresh_secret must differ",
            ));
        }
        if self.access_ttl_minutes == 0 || self.refresh_ttl_days == 0 {
            return Err(AppError::configuration("Credential TTLs must be positive"));
        }
        Ok(())
    }
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_issuer() -> String {
    "formhub".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    30
}

fn default_leeway() -> u64 {
    5
}

fn default_password_min() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_secrets_rejected() {
        let config = AuthConfig {
            refresh_secret: default_access_secret(),
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_validates() {
        assert!(AuthConfig::default().validate().is_ok());
    }
}
