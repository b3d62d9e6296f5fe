//! Account email addresses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string was rejected as an email address.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email cannot contain whitespace")]
    ContainsWhitespace,
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    #[error("email must contain exactly one @ symbol")]
    MultipleAtSymbols,
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// No dot with text on both sides after the `@`.
    #[error("email domain must look like domain.tld")]
    InvalidDomain,
}

/// An address with the `local@domain.tld` shape.
///
/// Only the shape is checked; whether the mailbox exists is the auth
/// service's business.
///
/// ```
/// use nexus_accounts_core::Email;
///
/// let email = Email::parse("maria.garcia+pedidos@tienda.com.co").unwrap();
/// assert_eq!(email.domain(), "tienda.com.co");
///
/// assert!(Email::parse("maria@localhost").is_err());
/// assert!(Email::parse("maria garcia@tienda.co").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Check the shape of `s` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] rule the input breaks, checked in
    /// declaration order.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::MultipleAtSymbols);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if !has_inner_dot(domain) {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Text before the `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.parts().0
    }

    /// Text after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.parts().1
    }

    fn parts(&self) -> (&str, &str) {
        self.0.split_once('@').unwrap_or((&self.0, ""))
    }
}

/// A dot that is neither the first nor the last character.
fn has_inner_dot(domain: &str) -> bool {
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Whether `s` has the `local@domain.tld` shape.
#[must_use]
pub fn validate_email(s: &str) -> bool {
    Email::parse(s).is_ok()
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_storefront_addresses() {
        for ok in [
            "maria@tienda.co",
            "maria.garcia@tienda.co",
            "maria+pedidos@tienda.co",
            "ventas@mail.tienda.com.co",
            "x@y.z",
        ] {
            assert!(Email::parse(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn test_rejections_name_the_rule() {
        let cases = [
            ("", EmailError::Empty),
            ("maria garcia@tienda.co", EmailError::ContainsWhitespace),
            ("maria@tienda.co\n", EmailError::ContainsWhitespace),
            ("tienda.co", EmailError::MissingAtSymbol),
            ("maria@ventas@tienda.co", EmailError::MultipleAtSymbols),
            ("@tienda.co", EmailError::EmptyLocalPart),
            ("maria@", EmailError::InvalidDomain),
            ("maria@localhost", EmailError::InvalidDomain),
            ("maria@.co", EmailError::InvalidDomain),
            ("maria@tienda.", EmailError::InvalidDomain),
        ];
        for (input, expected) in cases {
            assert_eq!(Email::parse(input), Err(expected), "{input:?}");
        }
    }

    #[test]
    fn test_leading_dot_allowed_when_inner_dot_exists() {
        assert!(Email::parse("maria@.tienda.co").is_ok());
    }

    #[test]
    fn test_validate_email_predicate() {
        assert!(validate_email("a@b.c"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("ab.c"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_parts_and_wire_form() {
        let email: Email = "soporte@tienda.co".parse().unwrap();
        assert_eq!(email.local_part(), "soporte");
        assert_eq!(email.domain(), "tienda.co");
        assert_eq!(email.to_string(), "soporte@tienda.co");
        assert_eq!(
            serde_json::to_value(&email).unwrap(),
            serde_json::json!("soporte@tienda.co")
        );
    }
}
