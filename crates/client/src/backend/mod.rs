//! The capability the account client calls into.
//!
//! Split along the two halves of a Supabase project:
//! - [`AuthApi`] - sign-up, sign-in, sign-out, session, user updates
//! - [`TableApi`] - select, insert, update and delete over a [`Query`]
//!
//! Session state lives in the backend instance, never in a global. Any type
//! implementing both halves is a [`Backend`].

mod supabase;
mod wire;

pub use supabase::SupabaseBackend;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;

use nexus_accounts_core::{Account, Session};

use crate::error::ClientError;
use crate::query::Query;

/// Outcome of a sign-up.
#[derive(Debug, Clone)]
pub struct SignUp {
    /// The newly created account.
    pub user: Account,
    /// Present when the project confirms accounts automatically.
    pub session: Option<Session>,
}

/// Attributes of the current user that can be changed.
#[derive(Debug, Clone, Default)]
pub struct UserAttributes {
    pub email: Option<String>,
    pub password: Option<SecretString>,
    /// Replacement metadata.
    pub data: Option<Value>,
}

/// Authentication capability.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account with a password and free-form metadata.
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        data: &Value,
    ) -> Result<SignUp, ClientError>;

    /// Exchange credentials for a session, which becomes the current one.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, ClientError>;

    /// End the current session. Succeeds when there is none.
    async fn sign_out(&self) -> Result<(), ClientError>;

    /// The current session, or `None` when signed out.
    async fn session(&self) -> Result<Option<Session>, ClientError>;

    /// Change attributes of the signed-in user.
    async fn update_user(&self, attributes: &UserAttributes) -> Result<Account, ClientError>;
}

/// Table capability.
#[async_trait]
pub trait TableApi: Send + Sync {
    /// Rows matching the query, in the query's order.
    async fn select(&self, query: &Query) -> Result<Vec<Value>, ClientError>;

    /// Insert one row and return what was stored.
    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, ClientError>;

    /// Merge `patch` into every matching row and return the updated rows.
    async fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, ClientError>;

    /// Delete every matching row.
    async fn delete(&self, query: &Query) -> Result<(), ClientError>;
}

/// Everything the account client needs.
pub trait Backend: AuthApi + TableApi {}

impl<T: AuthApi + TableApi> Backend for T {}
