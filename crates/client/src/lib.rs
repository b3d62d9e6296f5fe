//! NexusShop Accounts Client - account, profile and address operations.
//!
//! Every operation performs one call against a Supabase project (the GoTrue
//! auth API or a PostgREST table) and resolves to `Result<T, ClientError>`.
//! Nothing is retried and nothing is cached apart from the signed-in session.
//!
//! # Architecture
//!
//! - [`AccountClient`] holds the operations and the table names they target
//! - [`backend::Backend`] is the capability it calls: auth plus table access
//! - [`SupabaseBackend`] implements it over HTTPS with `reqwest`
//!
//! Tests substitute their own backend, so the client never needs a network.
//!
//! # Example
//!
//! ```rust,no_run
//! use nexus_accounts_client::{AccountClient, SupabaseBackend, SupabaseConfig};
//! use secrecy::SecretString;
//!
//! # async fn demo() -> Result<(), nexus_accounts_client::ClientError> {
//! let backend = SupabaseBackend::new(&SupabaseConfig::from_env())?;
//! let client = AccountClient::new(backend);
//!
//! let session = client
//!     .login("maria@example.com", &SecretString::from("Password123"))
//!     .await?;
//! let profile = client.user_profile(session.user.id).await?;
//! # let _ = profile;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod backend;
pub mod config;
pub mod error;
pub mod query;

pub use account::{AccountClient, TableNames};
pub use backend::{AuthApi, Backend, SignUp, SupabaseBackend, TableApi, UserAttributes};
pub use config::SupabaseConfig;
pub use error::ClientError;
pub use query::{Direction, Filter, Order, Query};

pub use nexus_accounts_core::{error_message, validate_email, validate_password};
