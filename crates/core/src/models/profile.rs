//! `user_profiles` rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Display and contact details for an account (one-to-one, keyed by `id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Same as the account id.
    pub id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_verified: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Profile row seeded at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub is_verified: bool,
}

impl NewProfile {
    /// Seed a profile from the registration form; missing fields become empty strings.
    #[must_use]
    pub fn seed(id: UserId, email: &str, full_name: Option<&str>, phone: Option<&str>) -> Self {
        Self {
            id,
            email: email.to_owned(),
            full_name: full_name.unwrap_or_default().to_owned(),
            phone: phone.unwrap_or_default().to_owned(),
            is_verified: false,
        }
    }
}

/// Partial profile update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ProfileUpdate {
    /// Whether no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.avatar_url.is_none()
            && self.bio.is_none()
            && self.city.is_none()
            && self.country.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_defaults_missing_fields_to_empty() {
        let id = UserId::new_v4();
        let profile = NewProfile::seed(id, "a@b.c", Some("Ana"), None);
        assert_eq!(profile.full_name, "Ana");
        assert_eq!(profile.phone, "");
        assert!(!profile.is_verified);
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = ProfileUpdate {
            bio: Some("Amante de la tecnología".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "bio": "Amante de la tecnología" })
        );
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_profile_tolerates_missing_columns() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "5f1c3e8a-4b2d-4c1e-9a7f-0d2b6e8c1a34",
            "email": "a@b.c"
        }))
        .unwrap();
        assert!(profile.bio.is_none());
        assert!(!profile.is_verified);
    }

    #[test]
    fn test_null_verified_flag_reads_as_false() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "5f1c3e8a-4b2d-4c1e-9a7f-0d2b6e8c1a34",
            "email": "a@b.c",
            "is_verified": null
        }))
        .unwrap();
        assert!(!profile.is_verified);
    }
}
