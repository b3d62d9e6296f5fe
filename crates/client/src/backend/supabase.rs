//! Supabase HTTP backend.
//!
//! Talks to the GoTrue auth API under `/auth/v1` and the PostgREST table API
//! under `/rest/v1`. The signed-in session is cached in memory and refreshed
//! when it expires.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::instrument;

use nexus_accounts_core::{Account, Session};

use super::wire::{self, TokenResponse};
use super::{AuthApi, SignUp, TableApi, UserAttributes};
use crate::config::SupabaseConfig;
use crate::error::ClientError;
use crate::query::Query;

/// Supabase project client.
///
/// Cloning is cheap and clones share the cached session.
///
/// # Authentication
///
/// Requests carry the anon key as `apikey`. Table requests are authorized with
/// the session's access token when signed in, and with the anon key otherwise,
/// so row-level security sees the right role.
#[derive(Clone)]
pub struct SupabaseBackend {
    inner: Arc<SupabaseBackendInner>,
}

struct SupabaseBackendInner {
    client: reqwest::Client,
    /// `None` when the configuration is incomplete.
    project: Option<Project>,
    /// In-memory session cache
    session: RwLock<Option<Session>>,
}

struct Project {
    /// Project URL without a trailing slash.
    base_url: String,
    anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseBackend")
            .field(
                "base_url",
                &self.inner.project.as_ref().map(|p| p.base_url.as_str()),
            )
            .finish_non_exhaustive()
    }
}

impl SupabaseBackend {
    /// Create a backend for the configured project.
    ///
    /// An incomplete configuration still yields a backend; every call on it
    /// fails with [`ClientError::NotConfigured`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidConfig` if the URL does not parse or the
    /// key is not a valid header value, and `ClientError::Http` if the HTTP
    /// client cannot be built.
    pub fn new(config: &SupabaseConfig) -> Result<Self, ClientError> {
        let project = match (&config.url, &config.anon_key) {
            (Some(url), Some(anon_key)) => {
                let parsed = url::Url::parse(url).map_err(|e| {
                    ClientError::InvalidConfig(format!("invalid project URL {url:?}: {e}"))
                })?;
                Some(Project {
                    base_url: parsed.as_str().trim_end_matches('/').to_string(),
                    anon_key: anon_key.clone(),
                })
            }
            _ => None,
        };

        let mut headers = HeaderMap::new();
        if let Some(project) = &project {
            let mut api_key = HeaderValue::from_str(project.anon_key.expose_secret())
                .map_err(|e| ClientError::InvalidConfig(format!("invalid anon key: {e}")))?;
            api_key.set_sensitive(true);
            headers.insert("apikey", api_key);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseBackendInner {
                client,
                project,
                session: RwLock::new(None),
            }),
        })
    }

    /// Set the session directly (for restoring a stored session).
    pub async fn set_session(&self, session: Session) {
        *self.inner.session.write().await = Some(session);
    }

    /// Drop the cached session without contacting the server.
    pub async fn clear_session(&self) {
        *self.inner.session.write().await = None;
    }

    fn project(&self) -> Result<&Project, ClientError> {
        self.inner.project.as_ref().ok_or(ClientError::NotConfigured)
    }

    fn auth_url(&self, path: &str) -> Result<String, ClientError> {
        Ok(format!("{}/auth/v1/{path}", self.project()?.base_url))
    }

    fn rest_url(&self, table: &str) -> Result<String, ClientError> {
        Ok(format!("{}/rest/v1/{table}", self.project()?.base_url))
    }

    /// Bearer token for table requests.
    async fn table_bearer(&self) -> Result<String, ClientError> {
        let anon_key = self.project()?.anon_key.expose_secret().to_string();
        Ok(self
            .session()
            .await?
            .map_or(anon_key, |session| {
                session.access_token.expose_secret().to_string()
            }))
    }

    /// Exchange a refresh token for a new session.
    #[instrument(skip(self, refresh_token))]
    async fn refresh_session(&self, refresh_token: &SecretString) -> Result<Session, ClientError> {
        let url = self.auth_url("token")?;
        let now = chrono::Utc::now().timestamp();

        let response = self
            .inner
            .client
            .post(url)
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token.expose_secret() }))
            .send()
            .await?;

        let token: TokenResponse = serde_json::from_value(read_json(response).await?)?;
        Ok(token.into_session(now))
    }
}

#[async_trait]
impl AuthApi for SupabaseBackend {
    #[instrument(skip(self, password, data), fields(email = %email))]
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        data: &Value,
    ) -> Result<SignUp, ClientError> {
        let url = self.auth_url("signup")?;
        let now = chrono::Utc::now().timestamp();

        let response = self
            .inner
            .client
            .post(url)
            .json(&json!({
                "email": email,
                "password": password.expose_secret(),
                "data": data,
            }))
            .send()
            .await?;

        let sign_up = wire::sign_up_from(read_json(response).await?, now)?;

        if let Some(session) = &sign_up.session {
            *self.inner.session.write().await = Some(session.clone());
        }

        Ok(sign_up)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, ClientError> {
        let url = self.auth_url("token")?;
        let now = chrono::Utc::now().timestamp();

        let response = self
            .inner
            .client
            .post(url)
            .query(&[("grant_type", "password")])
            .json(&json!({
                "email": email,
                "password": password.expose_secret(),
            }))
            .send()
            .await?;

        let token: TokenResponse = serde_json::from_value(read_json(response).await?)?;
        let session = token.into_session(now);

        // Cache the session
        *self.inner.session.write().await = Some(session.clone());

        Ok(session)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), ClientError> {
        let url = self.auth_url("logout")?;

        // The local session is gone whatever the server says
        let Some(session) = self.inner.session.write().await.take() else {
            return Ok(());
        };

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(session.access_token.expose_secret())
            .send()
            .await?;

        match read_json(response).await {
            Ok(_) => Ok(()),
            // Token already revoked or expired: the server has no session either
            Err(ClientError::Api {
                status: 401 | 403 | 404,
                ..
            }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn session(&self) -> Result<Option<Session>, ClientError> {
        self.project()?;

        let session = self.inner.session.read().await.clone();
        let Some(session) = session else {
            return Ok(None);
        };

        if !session.is_expired() {
            return Ok(Some(session));
        }

        let Some(refresh_token) = session.refresh_token.as_ref() else {
            tracing::debug!("Session expired without a refresh token, signing out locally");
            self.clear_session().await;
            return Ok(None);
        };

        match self.refresh_session(refresh_token).await {
            Ok(refreshed) => {
                *self.inner.session.write().await = Some(refreshed.clone());
                Ok(Some(refreshed))
            }
            Err(e) => {
                tracing::warn!("Session refresh failed: {e}");
                self.clear_session().await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self, attributes))]
    async fn update_user(&self, attributes: &UserAttributes) -> Result<Account, ClientError> {
        let url = self.auth_url("user")?;
        let session = self.session().await?.ok_or(ClientError::SessionMissing)?;

        let mut body = serde_json::Map::new();
        if let Some(email) = &attributes.email {
            body.insert("email".to_string(), Value::from(email.as_str()));
        }
        if let Some(password) = &attributes.password {
            body.insert(
                "password".to_string(),
                Value::from(password.expose_secret()),
            );
        }
        if let Some(data) = &attributes.data {
            body.insert("data".to_string(), data.clone());
        }

        let response = self
            .inner
            .client
            .put(url)
            .bearer_auth(session.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;

        let account: Account = serde_json::from_value(read_json(response).await?)?;

        if let Some(cached) = self.inner.session.write().await.as_mut() {
            cached.user = account.clone();
        }

        Ok(account)
    }
}

#[async_trait]
impl TableApi for SupabaseBackend {
    #[instrument(skip(self), fields(table = %query.table_name()))]
    async fn select(&self, query: &Query) -> Result<Vec<Value>, ClientError> {
        let url = self.rest_url(query.table_name())?;
        let bearer = self.table_bearer().await?;

        let response = self
            .inner
            .client
            .get(url)
            .bearer_auth(bearer)
            .query(&[("select", "*")])
            .query(&query.to_params())
            .send()
            .await?;

        Ok(wire::rows_from(read_json(response).await?))
    }

    #[instrument(skip(self, row))]
    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, ClientError> {
        let url = self.rest_url(table)?;
        let bearer = self.table_bearer().await?;

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation")
            .query(&[("select", "*")])
            .json(&row)
            .send()
            .await?;

        Ok(wire::rows_from(read_json(response).await?))
    }

    #[instrument(skip(self, patch), fields(table = %query.table_name()))]
    async fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, ClientError> {
        let url = self.rest_url(query.table_name())?;
        let bearer = self.table_bearer().await?;

        let response = self
            .inner
            .client
            .patch(url)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation")
            .query(&[("select", "*")])
            .query(&query.to_params())
            .json(&patch)
            .send()
            .await?;

        Ok(wire::rows_from(read_json(response).await?))
    }

    #[instrument(skip(self), fields(table = %query.table_name()))]
    async fn delete(&self, query: &Query) -> Result<(), ClientError> {
        let url = self.rest_url(query.table_name())?;
        let bearer = self.table_bearer().await?;

        let response = self
            .inner
            .client
            .delete(url)
            .bearer_auth(bearer)
            .query(&query.to_params())
            .send()
            .await?;

        read_json(response).await.map(|_| ())
    }
}

/// Read a JSON body, turning non-2xx responses into [`ClientError::Api`].
///
/// Empty bodies (204, `return=minimal`) read as `null`.
async fn read_json(response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(wire::api_error(status.as_u16(), &body));
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&body)?)
}
