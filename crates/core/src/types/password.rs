//! Password strength rules.
//!
//! The auth service enforces its own policy on sign-up; these rules are the
//! stricter client-side policy shown to users before a request is sent.

/// Minimum password length, in UTF-16 code units (as browsers count it).
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Reasons a password fails the client-side policy.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    /// Shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("password must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// No ASCII uppercase letter.
    #[error("password must contain an uppercase letter")]
    MissingUppercase,
    /// No ASCII digit.
    #[error("password must contain a digit")]
    MissingDigit,
}

/// Check a password against the policy, reporting the first rule it breaks.
///
/// # Errors
///
/// Returns the first failing rule, checked in order: length, uppercase, digit.
pub fn check_password(password: &str) -> Result<(), PasswordError> {
    if password.encode_utf16().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordError::MissingUppercase);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::MissingDigit);
    }

    Ok(())
}

/// Whether a password satisfies the policy.
#[must_use]
pub fn validate_password(password: &str) -> bool {
    check_password(password).is_ok()
}
