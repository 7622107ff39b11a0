//! Convenience result type alias for FormHub.

use crate::error::AppError;

/// A specialized `Result` type for FormHub operations.
pub type AppResult<T> = Result<T, AppError>;
