//! Registration, sign-in, password change and sign-out against the in-memory
//! backend.

#![allow(clippy::unwrap_used)]

use nexus_accounts_client::{AccountClient, ClientError, error_message};
use nexus_accounts_core::ProfileFields;
use nexus_accounts_integration_tests::MemoryBackend;
use secrecy::SecretString;

fn fields(full_name: &str) -> ProfileFields {
    ProfileFields {
        full_name: Some(full_name.to_string()),
        phone: Some("3001234567".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_register_then_login_then_logout() {
    let client = AccountClient::new(MemoryBackend::new());
    let password = SecretString::from("Password123");

    let account = client
        .register("maria@example.com", &password, &fields("María García"))
        .await
        .unwrap();
    assert_eq!(account.email.as_deref(), Some("maria@example.com"));
    assert_eq!(account.user_metadata["fullName"], "María García");

    // Email confirmation pending: no session yet
    assert!(client.current_session().await.unwrap().is_none());

    let session = client.login("maria@example.com", &password).await.unwrap();
    assert_eq!(session.user.id, account.id);

    let current = client.current_session().await.unwrap().unwrap();
    assert_eq!(current.user.id, account.id);

    client.logout().await.unwrap();
    assert!(client.current_session().await.unwrap().is_none());

    // Idempotent
    client.logout().await.unwrap();
}

#[tokio::test]
async fn test_auto_confirmed_registration_signs_in() {
    let backend = MemoryBackend::new().auto_confirm(true);
    let client = AccountClient::new(backend.clone());

    let account = client
        .register(
            "ana@example.com",
            &SecretString::from("Password123"),
            &ProfileFields::default(),
        )
        .await
        .unwrap();

    assert!(account.email_confirmed_at.is_some());
    assert!(backend.is_signed_in());
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let client = AccountClient::new(MemoryBackend::new());
    client
        .register(
            "maria@example.com",
            &SecretString::from("Password123"),
            &ProfileFields::default(),
        )
        .await
        .unwrap();

    let err = client
        .login("maria@example.com", &SecretString::from("Wrong1234"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid login credentials");
    assert_eq!(err.user_message(), error_message("invalid_credentials"));
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let client = AccountClient::new(MemoryBackend::new());
    let password = SecretString::from("Password123");

    client
        .register("maria@example.com", &password, &ProfileFields::default())
        .await
        .unwrap();
    let err = client
        .register("maria@example.com", &password, &ProfileFields::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "User already registered");
    assert_eq!(err.user_message(), "Este email ya está registrado.");
}

#[tokio::test]
async fn test_empty_credentials_fail_before_any_call() {
    let backend = MemoryBackend::new();
    let client = AccountClient::new(backend.clone());

    let err = client
        .register("", &SecretString::from("Password123"), &ProfileFields::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let err = client
        .login("maria@example.com", &SecretString::from(""))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    assert!(backend.rows("user_profiles").is_empty());
}

#[tokio::test]
async fn test_update_password_requires_session() {
    let client = AccountClient::new(MemoryBackend::new());

    let err = client
        .update_password(&SecretString::from("NewPassword456"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Auth session missing!");
    assert_eq!(err.code(), Some("not_authenticated"));
}

#[tokio::test]
async fn test_update_password_then_login_with_new_one() {
    let client = AccountClient::new(MemoryBackend::new());
    let old = SecretString::from("Password123");
    let new = SecretString::from("NewPassword456");

    client
        .register("maria@example.com", &old, &ProfileFields::default())
        .await
        .unwrap();
    client.login("maria@example.com", &old).await.unwrap();
    client.update_password(&new).await.unwrap();
    client.logout().await.unwrap();

    assert!(client.login("maria@example.com", &old).await.is_err());
    assert!(client.login("maria@example.com", &new).await.is_ok());
}
