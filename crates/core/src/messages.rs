//! User-facing messages for known error codes.
//!
//! Codes are the machine-readable values reported by the auth service (or
//! raised locally). Messages are Spanish, matching the storefront's locale.

use core::fmt;
use core::str::FromStr;

/// Message shown for any code without a dedicated entry.
pub const FALLBACK_MESSAGE: &str = "Ocurrió un error. Intenta de nuevo.";

/// Error codes with a dedicated user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidCredentials,
    UserAlreadyExists,
    WeakPassword,
    ValidationFailed,
    NetworkError,
    Unauthorized,
    NotAuthenticated,
}

impl ErrorCode {
    /// Every known code.
    pub const ALL: [Self; 7] = [
        Self::InvalidCredentials,
        Self::UserAlreadyExists,
        Self::WeakPassword,
        Self::ValidationFailed,
        Self::NetworkError,
        Self::Unauthorized,
        Self::NotAuthenticated,
    ];

    /// The wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::UserAlreadyExists => "user_already_exists",
            Self::WeakPassword => "weak_password",
            Self::ValidationFailed => "validation_failed",
            Self::NetworkError => "network_error",
            Self::Unauthorized => "unauthorized",
            Self::NotAuthenticated => "not_authenticated",
        }
    }

    /// The localized message for this code.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Email o contraseña incorrectos.",
            Self::UserAlreadyExists => "Este email ya está registrado.",
            Self::WeakPassword => "La contraseña es muy débil.",
            Self::ValidationFailed => "Validación fallida. Verifica los datos.",
            Self::NetworkError => "Error de conexión. Intenta de nuevo.",
            Self::Unauthorized => "No autorizado.",
            Self::NotAuthenticated => "Debes iniciar sesión.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or(())
    }
}

/// Look up the user-facing message for an error code.
///
/// Total: unknown codes (including the empty string) map to
/// [`FALLBACK_MESSAGE`].
///
/// ```
/// use nexus_accounts_core::error_message;
///
/// assert_eq!(error_message("unauthorized"), "No autorizado.");
/// assert_eq!(error_message("???"), "Ocurrió un error. Intenta de nuevo.");
/// ```
#[must_use]
pub fn error_message(code: &str) -> &'static str {
    code.parse::<ErrorCode>()
        .map_or(FALLBACK_MESSAGE, ErrorCode::message)
}
