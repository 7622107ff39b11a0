//! User account status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use formhub_core::AppError;

/// Account status for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account is active and can authenticate.
    Active,
    /// Account is blocked by an administrator.
    Suspended,
    /// Account is soft-deleted. Terminal.
    Deleted,
}

impl UserStatus {
    /// Only active accounts authenticate.
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Check whether moving to `next` is allowed.
    ///
    /// `active ⇄ suspended` and `active → deleted`; setting the current
    /// status again is a no-op.
    pub fn transition_to(&self, next: UserStatus) -> Result<UserStatus, AppError> {
        match (self, next) {
            (current, next) if *current == next => Ok(next),
            (Self::Active, Self::Suspended)
            | (Self::Suspended, Self::Active)
            | (Self::Active, Self::Deleted) => Ok(next),
            (current, next) => Err(AppError::validation(format!(
                "Cannot change user status from {current} to {next}"
            ))),
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "deleted" => Ok(Self::Deleted),
            _ => Err(AppError::validation(format!(
                "Invalid user status: '{s}'. Expected one of: active, suspended, deleted"
            ))),
        }
    }
}
