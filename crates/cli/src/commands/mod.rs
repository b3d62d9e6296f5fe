//! Command implementations.
//!
//! # Environment Variables
//!
//! - `REACT_APP_SUPABASE_URL` / `VITE_SUPABASE_URL` - Project URL
//! - `REACT_APP_ANON_KEY` / `VITE_SUPABASE_ANON_KEY` - Anon key
//! - `NX_ACCOUNTS_PASSWORD` - Password for commands that sign in

pub mod address;
pub mod auth;
pub mod profile;
pub mod validate;

use nexus_accounts_client::{AccountClient, ClientError, SupabaseBackend, SupabaseConfig};
use nexus_accounts_core::Session;
use secrecy::SecretString;
use serde::Serialize;
use thiserror::Error;

/// Client type every command runs against.
pub type Client = AccountClient<SupabaseBackend>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The account service rejected the call.
    #[error("{message}")]
    Client {
        message: String,
        #[source]
        source: ClientError,
    },

    /// Output could not be encoded.
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    /// Input failed a local check.
    #[error("{0}")]
    Invalid(String),
}

impl From<ClientError> for CommandError {
    fn from(source: ClientError) -> Self {
        let message = match source.code() {
            Some(code) => format!("{source} ({code})"),
            None => source.to_string(),
        };
        Self::Client { message, source }
    }
}

/// Credentials for commands that act as a signed-in account.
pub struct SignIn {
    pub email: String,
    pub password: SecretString,
}

/// Build a client from the environment.
///
/// # Errors
///
/// Returns an error if the configured values are unusable.
pub fn connect() -> Result<Client, CommandError> {
    let config = SupabaseConfig::from_env();
    if !config.is_configured() {
        return Err(ClientError::NotConfigured.into());
    }
    Ok(AccountClient::new(SupabaseBackend::new(&config)?))
}

/// Sign in and return the new session.
pub async fn sign_in(client: &Client, credentials: &SignIn) -> Result<Session, CommandError> {
    let session = client
        .login(&credentials.email, &credentials.password)
        .await?;
    tracing::debug!(user_id = %session.user.id, "Signed in");
    Ok(session)
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
