//! Scenario tests for the NexusShop accounts client.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory scenarios
//! cargo test -p nexus-accounts-integration-tests
//!
//! # Against a real project (needs REACT_APP_SUPABASE_URL and REACT_APP_ANON_KEY)
//! cargo test -p nexus-accounts-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `account_flow` - Registration, sign-in, password change, sign-out
//! - `profile_preferences` - Per-account records and their timestamps
//! - `addresses` - Address ordering and deletion
//! - `registration_best_effort` - Registration with failing side effects
//! - `live_supabase` - The same flow over HTTPS (ignored by default)
//!
//! [`MemoryBackend`] stands in for a Supabase project: it keeps accounts,
//! the current session and table rows in memory and reports failures with the
//! same messages and codes the real services use.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use nexus_accounts_client::{
    AuthApi, ClientError, Query, SignUp, TableApi, TableNames, UserAttributes,
};
use nexus_accounts_core::{Account, Session, UserId};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

/// Minimum password length the auth service enforces.
const AUTH_MIN_PASSWORD_LENGTH: usize = 6;

/// In-memory auth service and tables.
///
/// Clones share state.
#[derive(Clone)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

struct State {
    /// Accounts keyed by email.
    users: HashMap<String, StoredUser>,
    session: Option<Session>,
    tables: HashMap<String, Vec<Value>>,
    next_row_id: i64,
    auto_confirm: bool,
}

struct StoredUser {
    account: Account,
    password: String,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// A backend with the default account tables and email confirmation on.
    #[must_use]
    pub fn new() -> Self {
        let tables = TableNames::default();
        Self::with_tables(&[
            tables.profiles.as_str(),
            tables.preferences.as_str(),
            tables.addresses.as_str(),
        ])
    }

    /// A backend that only knows the given tables.
    #[must_use]
    pub fn with_tables(tables: &[&str]) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                users: HashMap::new(),
                session: None,
                tables: tables
                    .iter()
                    .map(|name| ((*name).to_string(), Vec::new()))
                    .collect(),
                next_row_id: 1,
                auto_confirm: false,
            })),
        }
    }

    /// Sign new accounts in immediately instead of waiting for confirmation.
    #[must_use]
    pub fn auto_confirm(self, enabled: bool) -> Self {
        self.lock().auto_confirm = enabled;
        self
    }

    /// Snapshot of every row in a table.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// Whether a session is currently held.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.lock().session.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl State {
    fn table_mut(&mut self, name: &str) -> Result<&mut Vec<Value>, ClientError> {
        self.tables.get_mut(name).ok_or_else(|| ClientError::Api {
            status: 404,
            code: Some("42P01".to_string()),
            message: format!("relation \"public.{name}\" does not exist"),
        })
    }

    fn start_session(&mut self, account: &Account) -> Session {
        let mut session = Session::new(
            SecretString::from(format!("memory-{}", uuid::Uuid::new_v4())),
            account.clone(),
        );
        session.expires_at = Some(Utc::now().timestamp() + 3600);
        self.session = Some(session.clone());
        session
    }
}

fn auth_error(status: u16, code: &str, message: &str) -> ClientError {
    ClientError::Api {
        status,
        code: Some(code.to_string()),
        message: message.to_string(),
    }
}

fn check_auth_password(password: &str) -> Result<(), ClientError> {
    if password.chars().count() < AUTH_MIN_PASSWORD_LENGTH {
        return Err(auth_error(
            422,
            "weak_password",
            "Password should be at least 6 characters.",
        ));
    }
    Ok(())
}

#[async_trait]
impl AuthApi for MemoryBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        data: &Value,
    ) -> Result<SignUp, ClientError> {
        let mut state = self.lock();

        if state.users.contains_key(email) {
            return Err(auth_error(
                422,
                "user_already_exists",
                "User already registered",
            ));
        }
        check_auth_password(password.expose_secret())?;

        let now = Utc::now();
        let mut account = Account::new(UserId::new_v4(), email);
        account.created_at = Some(now);
        account.updated_at = Some(now);
        account.user_metadata = data.as_object().cloned().unwrap_or_default();

        let session = if state.auto_confirm {
            account.email_confirmed_at = Some(now);
            Some(state.start_session(&account))
        } else {
            None
        };

        state.users.insert(
            email.to_string(),
            StoredUser {
                account: account.clone(),
                password: password.expose_secret().to_string(),
            },
        );

        Ok(SignUp {
            user: account,
            session,
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, ClientError> {
        let mut state = self.lock();

        let account = match state.users.get_mut(email) {
            Some(user) if user.password == password.expose_secret() => {
                user.account.last_sign_in_at = Some(Utc::now());
                user.account.clone()
            }
            _ => {
                return Err(auth_error(
                    400,
                    "invalid_credentials",
                    "Invalid login credentials",
                ));
            }
        };

        Ok(state.start_session(&account))
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        self.lock().session = None;
        Ok(())
    }

    async fn session(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.lock().session.clone())
    }

    async fn update_user(&self, attributes: &UserAttributes) -> Result<Account, ClientError> {
        let mut state = self.lock();

        let email = state
            .session
            .as_ref()
            .and_then(|session| session.user.email.clone())
            .ok_or(ClientError::SessionMissing)?;

        if let Some(password) = &attributes.password {
            check_auth_password(password.expose_secret())?;
        }

        let mut user = state
            .users
            .remove(&email)
            .ok_or(ClientError::SessionMissing)?;

        if let Some(password) = &attributes.password {
            user.password = password.expose_secret().to_string();
        }
        if let Some(data) = &attributes.data {
            user.account.user_metadata = data.as_object().cloned().unwrap_or_default();
        }
        if let Some(new_email) = &attributes.email {
            user.account.email = Some(new_email.clone());
        }
        user.account.updated_at = Some(Utc::now());

        let account = user.account.clone();
        let key = account.email.clone().unwrap_or(email);
        state.users.insert(key, user);

        if let Some(session) = state.session.as_mut() {
            session.user = account.clone();
        }

        Ok(account)
    }
}

#[async_trait]
impl TableApi for MemoryBackend {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, ClientError> {
        let mut state = self.lock();
        let table = state.table_mut(query.table_name())?;

        let mut rows: Vec<Value> = table
            .iter()
            .filter(|row| query.matches(row))
            .cloned()
            .collect();
        rows.sort_by(|a, b| query.compare(a, b));

        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, ClientError> {
        let mut state = self.lock();

        let Value::Object(mut fields) = row else {
            return Err(ClientError::Api {
                status: 400,
                code: Some("PGRST102".to_string()),
                message: "All object keys must match".to_string(),
            });
        };

        // Serial ids for tables whose rows do not bring their own
        let serial = !fields.contains_key("id");
        if serial {
            fields.insert("id".to_string(), Value::from(state.next_row_id));
        }
        fields
            .entry("created_at")
            .or_insert_with(|| Value::from(Utc::now().to_rfc3339()));

        let row = Value::Object(fields);
        state.table_mut(table)?.push(row.clone());
        if serial {
            state.next_row_id += 1;
        }

        Ok(vec![row])
    }

    async fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, ClientError> {
        let mut state = self.lock();
        let table = state.table_mut(query.table_name())?;
        let patch = patch.as_object().cloned().unwrap_or_else(Map::new);

        let mut updated = Vec::new();
        for row in table.iter_mut().filter(|row| query.matches(row)) {
            if let Value::Object(fields) = row {
                for (key, value) in &patch {
                    fields.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }

        Ok(updated)
    }

    async fn delete(&self, query: &Query) -> Result<(), ClientError> {
        let mut state = self.lock();
        state
            .table_mut(query.table_name())?
            .retain(|row| !query.matches(row));
        Ok(())
    }
}
