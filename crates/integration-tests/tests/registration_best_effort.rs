//! Registration succeeds even when seeding the profile tables fails.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use nexus_accounts_client::{AccountClient, TableNames};
use nexus_accounts_core::ProfileFields;
use nexus_accounts_integration_tests::MemoryBackend;
use secrecy::SecretString;

fn missing_tables() -> TableNames {
    TableNames {
        profiles: "no_such_profiles".to_string(),
        preferences: "no_such_preferences".to_string(),
        addresses: "no_such_addresses".to_string(),
    }
}

#[tokio::test]
async fn test_register_ignores_failed_inserts() {
    let client = AccountClient::with_tables(MemoryBackend::new(), missing_tables());
    let password = SecretString::from("Password123");

    let account = client
        .register("maria@example.com", &password, &ProfileFields::default())
        .await
        .unwrap();
    assert_eq!(account.email.as_deref(), Some("maria@example.com"));

    // The account itself exists
    let session = client.login("maria@example.com", &password).await.unwrap();
    assert_eq!(session.user.id, account.id);

    // Reads surface the table error as a value
    let err = client.user_profile(account.id).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "relation \"public.no_such_profiles\" does not exist"
    );
    assert!(client.user_addresses(account.id).await.is_err());
}

#[tokio::test]
async fn test_register_with_only_profiles_table() {
    let backend = MemoryBackend::with_tables(&["user_profiles"]);
    let client = AccountClient::new(backend.clone());

    let account = client
        .register(
            "maria@example.com",
            &SecretString::from("Password123"),
            &ProfileFields::default(),
        )
        .await
        .unwrap();

    let profiles = backend.rows("user_profiles");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["id"], account.id.to_string());
    assert!(client.user_preferences(account.id).await.is_err());
}

#[tokio::test]
async fn test_auth_rejection_still_fails_registration() {
    let client = AccountClient::new(MemoryBackend::new());

    let err = client
        .register(
            "maria@example.com",
            &SecretString::from("abc"),
            &ProfileFields::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("weak_password"));
    assert_eq!(err.user_message(), "La contraseña es muy débil.");
}
