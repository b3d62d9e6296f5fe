//! Account and profile operations.
//!
//! [`AccountClient`] turns typed calls into auth and table calls on a
//! [`Backend`]. Every operation returns `Result<T, ClientError>`; remote
//! messages are passed through unchanged in the error's `Display`.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use nexus_accounts_core::{
    Account, Address, AddressId, NewAddress, NewPreferences, NewProfile, Preferences,
    PreferencesUpdate, Profile, ProfileFields, ProfileUpdate, Session, UserId,
};

use crate::backend::{Backend, UserAttributes};
use crate::error::ClientError;
use crate::query::{Direction, Query};

/// Tables holding the per-account records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub profiles: String,
    pub preferences: String,
    pub addresses: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            profiles: "user_profiles".to_string(),
            preferences: "user_preferences".to_string(),
            addresses: "user_addresses".to_string(),
        }
    }
}

/// Client for registration, sessions, profiles, preferences and addresses.
///
/// Holds no state of its own; the session lives in the backend.
#[derive(Debug, Clone)]
pub struct AccountClient<B> {
    backend: B,
    tables: TableNames,
}

/// A partial update with the modification time attached.
#[derive(Serialize)]
struct Stamped<'a, T> {
    #[serde(flatten)]
    fields: &'a T,
    updated_at: DateTime<Utc>,
}

impl<'a, T: Serialize> Stamped<'a, T> {
    fn now(fields: &'a T) -> Self {
        Self {
            fields,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Serialize)]
struct AddressRow<'a> {
    user_id: UserId,
    #[serde(flatten)]
    address: &'a NewAddress,
}

impl<B: Backend> AccountClient<B> {
    /// Create a client over the default tables.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_tables(backend, TableNames::default())
    }

    /// Create a client over custom table names.
    #[must_use]
    pub const fn with_tables(backend: B, tables: TableNames) -> Self {
        Self { backend, tables }
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn tables(&self) -> &TableNames {
        &self.tables
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Create an account, then seed its profile and preferences rows.
    ///
    /// The seeding inserts are best-effort: a failure is logged and the
    /// account is still returned.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for an empty email or password, or
    /// the sign-up failure reported by the auth service.
    #[instrument(skip(self, password, profile_fields), fields(email = %email))]
    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
        profile_fields: &ProfileFields,
    ) -> Result<Account, ClientError> {
        require_credentials(email, password)?;

        let metadata = serde_json::to_value(profile_fields)?;
        let sign_up = self.backend.sign_up(email, password, &metadata).await?;
        let user = sign_up.user;

        tracing::info!(user_id = %user.id, "Account created");

        let profile = NewProfile::seed(
            user.id,
            email,
            profile_fields.full_name.as_deref(),
            profile_fields.phone.as_deref(),
        );
        if let Err(e) = self.insert_row(&self.tables.profiles, &profile).await {
            tracing::warn!(user_id = %user.id, "Failed to create profile: {e}");
        }

        let preferences = NewPreferences::defaults_for(user.id);
        if let Err(e) = self
            .insert_row(&self.tables.preferences, &preferences)
            .await
        {
            tracing::warn!(user_id = %user.id, "Failed to create preferences: {e}");
        }

        Ok(user)
    }

    /// Sign in with email and password. The session becomes the current one.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for an empty email or password, or
    /// the auth service's message for rejected credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, ClientError> {
        require_credentials(email, password)?;
        self.backend.sign_in_with_password(email, password).await
    }

    /// End the current session. Succeeds when already signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the auth service fails to revoke the session.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.backend.sign_out().await
    }

    /// The current session, or `None` when signed out.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a failed refresh.
    #[instrument(skip(self))]
    pub async fn current_session(&self) -> Result<Option<Session>, ClientError> {
        self.backend.session().await
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::SessionMissing` when signed out, or the auth
    /// service's message if the password is rejected.
    #[instrument(skip(self, new_password))]
    pub async fn update_password(
        &self,
        new_password: &SecretString,
    ) -> Result<Account, ClientError> {
        let attributes = UserAttributes {
            password: Some(new_password.clone()),
            ..Default::default()
        };
        self.backend.update_user(&attributes).await
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Fetch the profile row for an account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotSingleRow` unless exactly one row matches.
    #[instrument(skip(self))]
    pub async fn user_profile(&self, user_id: UserId) -> Result<Profile, ClientError> {
        let query = Query::table(&self.tables.profiles).eq("id", user_id);
        decode(single(self.backend.select(&query).await?)?)
    }

    /// Merge the set fields into the profile and stamp `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotSingleRow` unless exactly one row was updated.
    #[instrument(skip(self, update))]
    pub async fn update_user_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, ClientError> {
        let query = Query::table(&self.tables.profiles).eq("id", user_id);
        let patch = serde_json::to_value(Stamped::now(update))?;
        decode(single(self.backend.update(&query, patch).await?)?)
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    /// Fetch the preferences row for an account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotSingleRow` unless exactly one row matches.
    #[instrument(skip(self))]
    pub async fn user_preferences(&self, user_id: UserId) -> Result<Preferences, ClientError> {
        let query = Query::table(&self.tables.preferences).eq("user_id", user_id);
        decode(single(self.backend.select(&query).await?)?)
    }

    /// Merge the set fields into the preferences and stamp `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotSingleRow` unless exactly one row was updated.
    #[instrument(skip(self, update))]
    pub async fn update_user_preferences(
        &self,
        user_id: UserId,
        update: &PreferencesUpdate,
    ) -> Result<Preferences, ClientError> {
        let query = Query::table(&self.tables.preferences).eq("user_id", user_id);
        let patch = serde_json::to_value(Stamped::now(update))?;
        decode(single(self.backend.update(&query, patch).await?)?)
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Store a new address for an account and return it with its id.
    ///
    /// # Errors
    ///
    /// Returns the table's message if the row is rejected.
    #[instrument(skip(self, address))]
    pub async fn add_user_address(
        &self,
        user_id: UserId,
        address: &NewAddress,
    ) -> Result<Address, ClientError> {
        let row = serde_json::to_value(AddressRow { user_id, address })?;
        let rows = self.backend.insert(&self.tables.addresses, row).await?;
        decode(single(rows)?)
    }

    /// All addresses of an account, the default first, then oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    #[instrument(skip(self))]
    pub async fn user_addresses(&self, user_id: UserId) -> Result<Vec<Address>, ClientError> {
        let query = Query::table(&self.tables.addresses)
            .eq("user_id", user_id)
            .order("is_default", Direction::Desc)
            .order("id", Direction::Asc);

        self.backend
            .select(&query)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Delete an address by id.
    ///
    /// Ownership is not checked here; row-level security on the table is
    /// expected to restrict deletes to the owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the table rejects the delete.
    #[instrument(skip(self))]
    pub async fn delete_user_address(&self, address_id: AddressId) -> Result<(), ClientError> {
        let query = Query::table(&self.tables.addresses).eq("id", address_id);
        self.backend.delete(&query).await
    }

    async fn insert_row<T: Serialize + Sync>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<(), ClientError> {
        self.backend
            .insert(table, serde_json::to_value(row)?)
            .await
            .map(|_| ())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn require_credentials(email: &str, password: &SecretString) -> Result<(), ClientError> {
    if email.trim().is_empty() {
        return Err(ClientError::Validation("Email is required".to_string()));
    }
    if password.expose_secret().is_empty() {
        return Err(ClientError::Validation("Password is required".to_string()));
    }
    Ok(())
}

/// The only row of a result that must have exactly one.
fn single(mut rows: Vec<Value>) -> Result<Value, ClientError> {
    match rows.len() {
        1 => rows.pop().ok_or(ClientError::NotSingleRow { rows: 0 }),
        n => Err(ClientError::NotSingleRow { rows: n }),
    }
}

fn decode<T: DeserializeOwned>(row: Value) -> Result<T, ClientError> {
    Ok(serde_json::from_value(row)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_default_table_names() {
        let tables = TableNames::default();
        assert_eq!(tables.profiles, "user_profiles");
        assert_eq!(tables.preferences, "user_preferences");
        assert_eq!(tables.addresses, "user_addresses");
    }

    #[test]
    fn test_single_requires_exactly_one_row() {
        assert_eq!(single(vec![json!({ "id": 1 })]).unwrap(), json!({ "id": 1 }));
        assert!(matches!(
            single(Vec::new()),
            Err(ClientError::NotSingleRow { rows: 0 })
        ));
        assert!(matches!(
            single(vec![json!({}), json!({})]),
            Err(ClientError::NotSingleRow { rows: 2 })
        ));
    }

    #[test]
    fn test_stamped_update_keeps_only_set_fields() {
        let update = ProfileUpdate {
            bio: Some("Hola".to_string()),
            ..Default::default()
        };
        let patch = serde_json::to_value(Stamped::now(&update)).unwrap();
        let object = patch.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object["bio"], "Hola");
        assert!(
            object["updated_at"]
                .as_str()
                .unwrap()
                .parse::<DateTime<Utc>>()
                .is_ok()
        );
    }

    #[test]
    fn test_address_row_carries_owner() {
        let user_id = UserId::new_v4();
        let address = NewAddress {
            label: Some("Casa".to_string()),
            city: Some("Bogotá".to_string()),
            ..Default::default()
        };
        let row = serde_json::to_value(AddressRow {
            user_id,
            address: &address,
        })
        .unwrap();

        assert_eq!(row["user_id"], user_id.to_string());
        assert_eq!(row["label"], "Casa");
        assert_eq!(row["is_default"], false);
        assert!(row.get("street_address").is_none());
    }

    #[test]
    fn test_empty_credentials_are_rejected() {
        assert!(matches!(
            require_credentials("", &SecretString::from("Password1")),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            require_credentials("a@b.co", &SecretString::from("")),
            Err(ClientError::Validation(_))
        ));
        assert!(require_credentials("a@b.co", &SecretString::from("x")).is_ok());
    }
}
