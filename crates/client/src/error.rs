//! Client error type.
//!
//! The `Display` of every variant is the human-readable message handed back to
//! callers. Messages reported by the remote service are passed through verbatim.

use nexus_accounts_core::{ErrorCode, error_message};
use thiserror::Error;

/// PostgREST code for a single-row request that matched zero or many rows.
pub const NOT_SINGLE_ROW_CODE: &str = "PGRST116";

/// Errors that can occur when calling the account service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable code, when the service reported one.
        code: Option<String>,
        /// Message as reported by the service.
        message: String,
    },

    /// A single-row read or write matched zero or several rows.
    #[error("JSON object requested, multiple (or no) rows returned")]
    NotSingleRow {
        /// Number of rows actually returned.
        rows: usize,
    },

    /// The operation needs a signed-in account.
    #[error("Auth session missing!")]
    SessionMissing,

    /// Project URL or anon key was never configured.
    #[error("Supabase is not configured: set the project URL and anon key")]
    NotConfigured,

    /// Configuration values are present but unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A payload did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    /// Machine-readable error code, if one applies.
    ///
    /// Remote codes are passed through; local failures map onto the codes the
    /// message table knows about.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            Self::NotSingleRow { .. } => Some(NOT_SINGLE_ROW_CODE),
            Self::SessionMissing => Some(ErrorCode::NotAuthenticated.as_str()),
            Self::Http(_) => Some(ErrorCode::NetworkError.as_str()),
            Self::Validation(_) => Some(ErrorCode::ValidationFailed.as_str()),
            Self::NotConfigured | Self::InvalidConfig(_) | Self::Decode(_) => None,
        }
    }

    /// HTTP status of a remote error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Localized message suitable for showing to an end user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        error_message(self.code().unwrap_or_default())
    }
}
