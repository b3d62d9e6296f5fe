//! `user_addresses` rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AddressId, UserId};

/// A shipping/contact address (many per account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Assigned by the table on insert.
    pub id: AddressId,
    pub user_id: UserId,
    pub label: Option<String>,
    pub street_address: Option<String>,
    pub apartment_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_default: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields for a new address. Completeness is left to the table constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apartment_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}
