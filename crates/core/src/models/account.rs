//! Auth service records: accounts and sessions.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::UserId;

/// An authenticated identity managed by the auth service.
///
/// The password is write-only and never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account id assigned on registration.
    pub id: UserId,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub email_confirmed_at: Option<DateTime<Utc>>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-form metadata supplied at sign-up.
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

impl Account {
    /// Create an account record with only an id and email set.
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
            phone: None,
            email_confirmed_at: None,
            last_sign_in_at: None,
            created_at: None,
            updated_at: None,
            user_metadata: Map::new(),
        }
    }
}

/// Proof that an account is currently signed in.
///
/// Implements `Debug` manually to redact tokens.
#[derive(Clone)]
pub struct Session {
    /// Bearer token for authenticated requests.
    pub access_token: SecretString,
    /// Token used to obtain a new access token once this one expires.
    pub refresh_token: Option<SecretString>,
    /// Usually `bearer`.
    pub token_type: String,
    /// Unix timestamp when the access token expires.
    pub expires_at: Option<i64>,
    /// The signed-in account.
    pub user: Account,
}

impl Session {
    /// Create a session with no refresh token and no expiry.
    #[must_use]
    pub fn new(access_token: SecretString, user: Account) -> Self {
        Self {
            access_token,
            refresh_token: None,
            token_type: "bearer".to_string(),
            expires_at: None,
            user,
        }
    }

    /// Check if the access token has expired.
    ///
    /// Sessions without an expiry never expire.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Check expiry against an explicit unix timestamp.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Profile details collected by the registration form.
///
/// Stored verbatim as account metadata, and used to seed the profile row.
/// Keys are camelCase so metadata written by the web client reads the same.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Any other metadata to attach to the account.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_account_deserializes_auth_payload() {
        let json = serde_json::json!({
            "id": "5f1c3e8a-4b2d-4c1e-9a7f-0d2b6e8c1a34",
            "aud": "authenticated",
            "role": "authenticated",
            "email": "maria@example.com",
            "phone": "",
            "created_at": "2025-03-01T10:00:00.123456Z",
            "updated_at": "2025-03-01T10:00:00.123456Z",
            "user_metadata": { "fullName": "María García" },
            "identities": []
        });

        let account: Account = serde_json::from_value(json).unwrap();
        assert_eq!(account.email.as_deref(), Some("maria@example.com"));
        assert!(account.email_confirmed_at.is_none());
        assert_eq!(account.user_metadata["fullName"], "María García");
    }

    #[test]
    fn test_session_expiry() {
        let mut session = Session::new(
            SecretString::from("token"),
            Account::new(UserId::new_v4(), "a@b.c"),
        );
        assert!(!session.is_expired_at(i64::MAX));

        session.expires_at = Some(1_000);
        assert!(session.is_expired_at(1_000));
        assert!(!session.is_expired_at(999));
    }

    #[test]
    fn test_session_debug_redacts_tokens() {
        let mut session = Session::new(
            SecretString::from("super_secret_access"),
            Account::new(UserId::new_v4(), "a@b.c"),
        );
        session.refresh_token = Some(SecretString::from("super_secret_refresh"));

        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_access"));
        assert!(!debug_output.contains("super_secret_refresh"));
    }

    #[test]
    fn test_profile_fields_metadata_shape() {
        let mut fields = ProfileFields {
            full_name: Some("María García".to_string()),
            phone: None,
            ..Default::default()
        };
        fields
            .extra
            .insert("referral".to_string(), Value::from("newsletter"));

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "fullName": "María García", "referral": "newsletter" })
        );
    }
}
