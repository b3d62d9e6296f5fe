//! Remote records owned by an account.
//!
//! These mirror the rows returned by the auth service and the three profile
//! tables. Field names match the remote columns exactly; serde does the rest.
//!
//! Each table has three shapes:
//! - the full row (`Profile`, `Preferences`, `Address`)
//! - the insert payload (`NewProfile`, `NewPreferences`, `NewAddress`)
//! - a partial update where every field is optional (`ProfileUpdate`,
//!   `PreferencesUpdate`); absent fields are never serialized

pub mod account;
pub mod address;
pub mod preferences;
pub mod profile;

pub use account::{Account, ProfileFields, Session};
pub use address::{Address, NewAddress};
pub use preferences::{NewPreferences, Preferences, PreferencesUpdate};
pub use profile::{NewProfile, Profile, ProfileUpdate};

use serde::{Deserialize, Deserializer};

/// Read a nullable column into a non-optional field; `null` becomes the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
