//! Password policy enforcement for new passwords.

use formhub_core::config::AuthConfig;
use formhub_core::error::AppError;

/// Checks new passwords against the length and strength policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password, returning the first violation.
    ///
    /// `user_inputs` (email, display name) are penalized by the strength
    /// estimate so a password cannot simply repeat them.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, user_inputs);
        if estimate.score() < zxcvbn::Score::Three {
            return Err(AppError::validation(
                "Password is too weak. Please use a longer, less predictable password.",
            ));
        }

        Ok(())
    }
}
