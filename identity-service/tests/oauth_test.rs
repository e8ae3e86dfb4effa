mod common;

use common::{google_identity, register_user, setup};
use identity_service::dtos::ExternalIdentity;
use identity_service::models::AuthProvider;
use identity_service::services::ServiceError;
use identity_service::store::IdentityStore;

#[tokio::test]
async fn test_external_login_creates_principal_once() {
    let harness = setup().await;
    let identity = google_identity("google-sub-1", "dana@x.com", Some("Dana"));

    let (first, is_new) = harness
        .auth
        .login_external(identity.clone())
        .await
        .unwrap();
    assert!(is_new);

    let first_login = first.user.last_login;

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let (second, is_new) = harness.auth.login_external(identity).await.unwrap();
    assert!(!is_new);
    assert_eq!(second.user.id, first.user.id);

    // Reconciliation updated last_login on the existing principal
    assert!(second.user.last_login > first_login);
}

#[tokio::test]
async fn test_email_rotation_still_matches_subject() {
    let harness = setup().await;

    let (first, _) = harness
        .auth
        .login_external(google_identity("google-sub-1", "dana@x.com", Some("Dana")))
        .await
        .unwrap();

    // Provider rotated the user-visible email; the subject stays stable
    let (second, is_new) = harness
        .auth
        .login_external(google_identity("google-sub-1", "dana@new.com", Some("Dana")))
        .await
        .unwrap();

    assert!(!is_new);
    assert_eq!(second.user.id, first.user.id);
}

#[tokio::test]
async fn test_created_principal_is_trusted_and_passwordless() {
    let harness = setup().await;

    let (response, is_new) = harness
        .auth
        .login_external(google_identity("google-sub-9", "erin@x.com", Some("Erin")))
        .await
        .unwrap();
    assert!(is_new);

    assert_eq!(response.user.username, "Erin");
    assert!(response.user.email_verified);
    assert_eq!(response.user.provider, AuthProvider::Google);
    assert_eq!(response.user.roles, vec![harness.default_role_id]);

    let stored = harness
        .store
        .find_user_by_id(response.user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.password_hash.is_none());
    assert_eq!(stored.external_subject.as_deref(), Some("google-sub-9"));
}

#[tokio::test]
async fn test_username_synthesis_falls_back_to_email() {
    let harness = setup().await;

    let (response, _) = harness
        .auth
        .login_external(google_identity("google-sub-2", "frank@x.com", None))
        .await
        .unwrap();

    assert_eq!(response.user.username, "frank@x.com");
}

#[tokio::test]
async fn test_unregistered_provider_rejected() {
    let harness = setup().await;

    let identity = ExternalIdentity {
        provider: AuthProvider::Github,
        subject: "github-sub-1".to_string(),
        email: "gina@x.com".to_string(),
        first_name: None,
        last_name: None,
        display_name: None,
    };

    let result = harness.auth.login_external(identity).await;

    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn test_no_cross_provider_merge() {
    let harness = setup().await;

    register_user(&harness, "alice", "a@x.com", "password123").await;

    // Same email arriving via Google never merges into the local account;
    // the global email uniqueness verdict surfaces instead.
    let result = harness
        .auth
        .login_external(google_identity("google-sub-3", "a@x.com", Some("Alice")))
        .await;

    assert!(matches!(result, Err(ServiceError::DuplicateIdentity)));
}
