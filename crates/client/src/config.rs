//! Supabase project configuration.
//!
//! # Environment Variables
//!
//! ## Required
//! - `REACT_APP_SUPABASE_URL` (or `VITE_SUPABASE_URL`) - Project URL
//! - `REACT_APP_ANON_KEY` (or `VITE_SUPABASE_ANON_KEY`) - Public anon API key
//!
//! ## Optional
//! - `SUPABASE_TIMEOUT_SECS` - Per-request timeout (default: 30)
//!
//! Both naming conventions are accepted so the same `.env` file serves the web
//! bundle and this crate. A missing value is not fatal: it is logged, and the
//! backend built from the config fails every call with
//! [`ClientError::NotConfigured`](crate::ClientError::NotConfigured).

use std::time::Duration;

use secrecy::SecretString;

/// Accepted names for the project URL, in lookup order.
pub const URL_VARS: [&str; 2] = ["REACT_APP_SUPABASE_URL", "VITE_SUPABASE_URL"];

/// Accepted names for the anon key, in lookup order.
pub const ANON_KEY_VARS: [&str; 2] = ["REACT_APP_ANON_KEY", "VITE_SUPABASE_ANON_KEY"];

const TIMEOUT_VAR: &str = "SUPABASE_TIMEOUT_SECS";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a Supabase project.
///
/// Implements `Debug` manually to redact the anon key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: Option<String>,
    /// Public anon API key.
    pub anon_key: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SupabaseConfig {
    /// Build a configuration from values supplied by the host application.
    ///
    /// Empty strings count as missing.
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let config = Self {
            url: non_empty(url.into()),
            anon_key: non_empty(anon_key.into()).map(SecretString::from),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        config.warn_if_incomplete();
        config
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    #[must_use]
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = first_present(&lookup, &URL_VARS);
        let anon_key = first_present(&lookup, &ANON_KEY_VARS).map(SecretString::from);

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid {TIMEOUT_VAR}={raw:?}: {e}");
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            url,
            anon_key,
            timeout: Duration::from_secs(timeout),
        };
        config.warn_if_incomplete();
        config
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether both the URL and the anon key are present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }

    fn warn_if_incomplete(&self) {
        if self.url.is_none() {
            tracing::warn!(
                "Supabase URL is not configured; set {} or {}",
                URL_VARS[0],
                URL_VARS[1]
            );
        }
        if self.anon_key.is_none() {
            tracing::warn!(
                "Supabase anon key is not configured; set {} or {}",
                ANON_KEY_VARS[0],
                ANON_KEY_VARS[1]
            );
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// First non-empty value among the given variable names.
fn first_present(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| lookup(key).and_then(non_empty))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_react_app_names() {
        let config = SupabaseConfig::from_lookup(lookup_from(&[
            ("REACT_APP_SUPABASE_URL", "https://abcd.supabase.co"),
            ("REACT_APP_ANON_KEY", "anon-key"),
        ]));
        assert!(config.is_configured());
        assert_eq!(config.url.as_deref(), Some("https://abcd.supabase.co"));
        assert_eq!(
            config.anon_key.as_ref().map(|k| k.expose_secret()),
            Some("anon-key")
        );
    }

    #[test]
    fn test_vite_names_are_fallback() {
        let config = SupabaseConfig::from_lookup(lookup_from(&[
            ("VITE_SUPABASE_URL", "https://vite.supabase.co"),
            ("VITE_SUPABASE_ANON_KEY", "vite-key"),
        ]));
        assert!(config.is_configured());
        assert_eq!(config.url.as_deref(), Some("https://vite.supabase.co"));
    }

    #[test]
    fn test_react_app_wins_over_vite() {
        let config = SupabaseConfig::from_lookup(lookup_from(&[
            ("REACT_APP_SUPABASE_URL", "https://react.supabase.co"),
            ("VITE_SUPABASE_URL", "https://vite.supabase.co"),
        ]));
        assert_eq!(config.url.as_deref(), Some("https://react.supabase.co"));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let config = SupabaseConfig::from_lookup(lookup_from(&[
            ("REACT_APP_SUPABASE_URL", ""),
            ("VITE_SUPABASE_URL", "https://vite.supabase.co"),
            ("REACT_APP_ANON_KEY", "   "),
        ]));
        assert_eq!(config.url.as_deref(), Some("https://vite.supabase.co"));
        assert!(config.anon_key.is_none());
        assert!(!config.is_configured());
    }

    #[test]
    fn test_missing_everything_is_not_fatal() {
        let config = SupabaseConfig::from_lookup(|_| None);
        assert!(!config.is_configured());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_timeout_override_and_invalid_value() {
        let config = SupabaseConfig::from_lookup(lookup_from(&[("SUPABASE_TIMEOUT_SECS", "5")]));
        assert_eq!(config.timeout, Duration::from_secs(5));

        let config =
            SupabaseConfig::from_lookup(lookup_from(&[("SUPABASE_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_injected_values() {
        let config = SupabaseConfig::new("https://abcd.supabase.co", "anon-key")
            .with_timeout(Duration::from_secs(3));
        assert!(config.is_configured());
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(!SupabaseConfig::new("", "anon-key").is_configured());
    }

    #[test]
    fn test_debug_redacts_anon_key() {
        let config = SupabaseConfig::new("https://abcd.supabase.co", "super_secret_anon_key");
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("abcd.supabase.co"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_anon_key"));
    }
}
