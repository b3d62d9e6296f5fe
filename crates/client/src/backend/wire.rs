//! Wire formats of the auth and table APIs.

use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;

use nexus_accounts_core::{Account, Session};

use super::SignUp;
use crate::error::ClientError;

/// Token grant response from the auth API.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default)]
    expires_in: Option<i64>,
    /// Absolute expiry as a unix timestamp.
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    user: Account,
}

impl TokenResponse {
    pub(super) fn into_session(self, now: i64) -> Session {
        Session {
            access_token: SecretString::from(self.access_token),
            refresh_token: self.refresh_token.map(SecretString::from),
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_at: self
                .expires_at
                .or_else(|| self.expires_in.map(|secs| now + secs)),
            user: self.user,
        }
    }
}

/// Sign-up returns a token grant when accounts are auto-confirmed, and the
/// bare user otherwise.
pub(super) fn sign_up_from(value: Value, now: i64) -> Result<SignUp, ClientError> {
    if value.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(value)?;
        let session = token.into_session(now);
        Ok(SignUp {
            user: session.user.clone(),
            session: Some(session),
        })
    } else {
        Ok(SignUp {
            user: serde_json::from_value(value)?,
            session: None,
        })
    }
}

/// Normalize a table response body into rows.
pub(super) fn rows_from(value: Value) -> Vec<Value> {
    match value {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        row => vec![row],
    }
}

/// Error body fields used by either API.
///
/// - auth: `{"code": 400, "error_code": "invalid_credentials", "msg": "..."}`
/// - auth (legacy): `{"error": "invalid_grant", "error_description": "..."}`
/// - tables: `{"code": "PGRST116", "message": "...", "details": ..., "hint": ...}`
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    code: Option<Value>,
}

/// Build a [`ClientError::Api`] from a failed response.
pub(super) fn api_error(status: u16, body: &str) -> ClientError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let code = parsed.error_code.clone().or_else(|| match &parsed.code {
        Some(Value::String(code)) => Some(code.clone()),
        _ => None,
    });

    let message = parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or_else(|| parsed.error.clone())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {body}")
            }
        });

    ClientError::Api {
        status,
        code: code.or(parsed.error),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn user_json() -> Value {
        json!({
            "id": "5f1c3e8a-4b2d-4c1e-9a7f-0d2b6e8c1a34",
            "email": "maria@example.com",
            "user_metadata": {}
        })
    }

    #[test]
    fn test_token_response_expiry_from_expires_in() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": user_json()
        }))
        .unwrap();

        let session = token.into_session(1_000);
        assert_eq!(session.expires_at, Some(4_600));
        assert!(session.refresh_token.is_some());
        assert_eq!(session.user.email.as_deref(), Some("maria@example.com"));
    }

    #[test]
    fn test_token_response_prefers_expires_at() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "expires_in": 3600,
            "expires_at": 9_999,
            "user": user_json()
        }))
        .unwrap();
        assert_eq!(token.into_session(1_000).expires_at, Some(9_999));
    }

    #[test]
    fn test_sign_up_without_confirmation_returns_user_only() {
        let sign_up = sign_up_from(user_json(), 0).unwrap();
        assert!(sign_up.session.is_none());
        assert_eq!(sign_up.user.email.as_deref(), Some("maria@example.com"));
    }

    #[test]
    fn test_sign_up_with_auto_confirm_returns_session() {
        let sign_up = sign_up_from(
            json!({ "access_token": "a", "expires_in": 60, "user": user_json() }),
            0,
        )
        .unwrap();
        let session = sign_up.session.unwrap();
        assert_eq!(session.user.id, sign_up.user.id);
    }

    #[test]
    fn test_rows_from_shapes() {
        assert_eq!(rows_from(json!([{ "id": 1 }, { "id": 2 }])).len(), 2);
        assert!(rows_from(Value::Null).is_empty());
        assert_eq!(rows_from(json!({ "id": 1 })).len(), 1);
    }

    #[test]
    fn test_api_error_auth_shape() {
        let err = api_error(
            400,
            r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        );
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert_eq!(err.code(), Some("invalid_credentials"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_api_error_legacy_auth_shape() {
        let err = api_error(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert_eq!(err.code(), Some("invalid_grant"));
    }

    #[test]
    fn test_api_error_table_shape() {
        let err = api_error(
            404,
            r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.nope\" does not exist"}"#,
        );
        assert_eq!(err.to_string(), "relation \"public.nope\" does not exist");
        assert_eq!(err.code(), Some("42P01"));
    }

    #[test]
    fn test_api_error_unparsable_body() {
        let err = api_error(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
        assert_eq!(err.code(), None);

        let err = api_error(500, "");
        assert_eq!(err.to_string(), "HTTP 500");
    }
}
