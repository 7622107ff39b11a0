//! Unified application error types for FormHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. The [`ErrorKind`] carries the
//! identity/tenancy taxonomy that the HTTP layer maps to status codes.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Missing, invalid, or expired credential; wrong password; inactive account.
    Unauthorized,
    /// The credential or account exists, but under a different tenant than the
    /// one supplied. Reported as unauthorized, distinguishable by kind.
    TenantMismatch,
    /// Valid principal, insufficient permission.
    Forbidden,
    /// No tenant key was supplied with the request.
    MissingTenant,
    /// The supplied tenant key is unknown.
    TenantNotFound,
    /// The tenant exists but is not active.
    TenantSuspended,
    /// A tenant-scoped storage operation was attempted without a tenant.
    TenantRequired,
    /// Refresh credential failed signature, expiry, or version validation.
    InvalidRefreshToken,
    /// Natural-key uniqueness violation or concurrent modification.
    Conflict,
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::TenantMismatch => "TENANT_MISMATCH",
            Self::Forbidden => "FORBIDDEN",
            Self::MissingTenant => "MISSING_TENANT",
            Self::TenantNotFound => "TENANT_NOT_FOUND",
            Self::TenantSuspended => "TENANT_SUSPENDED",
            Self::TenantRequired => "TENANT_REQUIRED",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::Conflict => "CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL",
        }
    }

    /// Whether this kind means the caller failed authentication.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::TenantMismatch | Self::InvalidRefreshToken
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout FormHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a tenant-mismatch error.
    pub fn tenant_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TenantMismatch, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a missing-tenant error.
    pub fn missing_tenant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingTenant, message)
    }

    /// Create a tenant-not-found error.
    pub fn tenant_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TenantNotFound, message)
    }

    /// Create a tenant-suspended error.
    pub fn tenant_suspended(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TenantSuspended, message)
    }

    /// Create a tenant-required error.
    pub fn tenant_required(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TenantRequired, message)
    }

    /// Create an invalid-refresh-token error.
    pub fn invalid_refresh_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRefreshToken, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns `true` if this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = AppError::tenant_suspended("tenant 'acme' is suspended");
        assert_eq!(err.to_string(), "TENANT_SUSPENDED: tenant 'acme' is suspended");
    }

    #[test]
    fn test_authentication_failure_kinds() {
        assert!(ErrorKind::Unauthorized.is_authentication_failure());
        assert!(ErrorKind::TenantMismatch.is_authentication_failure());
        assert!(ErrorKind::InvalidRefreshToken.is_authentication_failure());
        assert!(!ErrorKind::Forbidden.is_authentication_failure());
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::with_source(ErrorKind::Database, "write failed", io);
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.kind, ErrorKind::Database);
    }
}
