//! `user_preferences` rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Theme written at registration.
pub const DEFAULT_THEME: &str = "light";
/// Language written at registration.
pub const DEFAULT_LANGUAGE: &str = "es";
/// Currency written at registration.
pub const DEFAULT_CURRENCY: &str = "COP";

/// UI, locale and notification settings (one-to-one, keyed by `user_id`).
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub user_id: UserId,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub theme: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub language: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub currency: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub notifications_email: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub notifications_push: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub notifications_sms: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub newsletter_subscribed: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Preferences row seeded at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPreferences {
    pub user_id: UserId,
    pub theme: String,
    pub language: String,
    pub currency: String,
}

impl NewPreferences {
    /// The fixed defaults every new account starts with.
    #[must_use]
    pub fn defaults_for(user_id: UserId) -> Self {
        Self {
            user_id,
            theme: DEFAULT_THEME.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Partial preferences update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_push: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_sms: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newsletter_subscribed: Option<bool>,
}
