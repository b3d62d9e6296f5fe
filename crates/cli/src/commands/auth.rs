//! Authentication commands.
//!
//! # Usage
//!
//! ```bash
//! nx-accounts register -e maria@example.com --full-name "María García" --phone 3001234567
//! nx-accounts login -e maria@example.com
//! nx-accounts password -e maria@example.com --new-password NewPassword456
//! ```

use nexus_accounts_core::{Account, ProfileFields, Session, check_password};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::{Client, CommandError, SignIn, print_json, sign_in};

/// Session details that are safe to print (no tokens).
#[derive(Serialize)]
struct SessionSummary<'a> {
    token_type: &'a str,
    expires_at: Option<i64>,
    user: &'a Account,
}

impl<'a> From<&'a Session> for SessionSummary<'a> {
    fn from(session: &'a Session) -> Self {
        Self {
            token_type: &session.token_type,
            expires_at: session.expires_at,
            user: &session.user,
        }
    }
}

/// Create an account.
///
/// Password strength is checked locally first so the user gets the specific
/// rule that failed.
pub async fn register(
    client: &Client,
    credentials: &SignIn,
    full_name: Option<String>,
    phone: Option<String>,
) -> Result<(), CommandError> {
    check_password(credentials.password.expose_secret())
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    let fields = ProfileFields {
        full_name,
        phone,
        ..Default::default()
    };

    let account = client
        .register(&credentials.email, &credentials.password, &fields)
        .await?;

    if account.email_confirmed_at.is_none() {
        tracing::info!("Check {} for a confirmation link", credentials.email);
    }

    print_json(&account)
}

pub async fn login(client: &Client, credentials: &SignIn) -> Result<(), CommandError> {
    let session = sign_in(client, credentials).await?;
    print_json(&SessionSummary::from(&session))
}

pub async fn logout(client: &Client, credentials: &SignIn) -> Result<(), CommandError> {
    sign_in(client, credentials).await?;
    client.logout().await?;
    tracing::info!("Signed out");
    Ok(())
}

/// Print the session held after signing in.
pub async fn session(client: &Client, credentials: &SignIn) -> Result<(), CommandError> {
    sign_in(client, credentials).await?;
    match client.current_session().await? {
        Some(session) => print_json(&SessionSummary::from(&session)),
        None => print_json(&serde_json::Value::Null),
    }
}

pub async fn change_password(
    client: &Client,
    credentials: &SignIn,
    new_password: SecretString,
) -> Result<(), CommandError> {
    check_password(new_password.expose_secret())
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    sign_in(client, credentials).await?;
    let account = client.update_password(&new_password).await?;
    tracing::info!(user_id = %account.id, "Password updated");
    Ok(())
}
