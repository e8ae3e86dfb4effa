mod common;

use common::{login_request, register_request, register_user, setup};
use identity_service::services::ServiceError;
use identity_service::store::IdentityStore;

#[tokio::test]
async fn test_register_then_login_roundtrip() {
    let harness = setup().await;

    let registered = register_user(&harness, "alice", "a@x.com", "password123").await;
    assert_eq!(registered.user.username, "alice");
    assert_eq!(registered.user.roles, vec![harness.default_role_id]);
    assert!(!registered.user.email_verified);

    let claims = harness
        .tokens
        .validate(&registered.tokens.access_token)
        .unwrap();
    assert_eq!(claims.sub, registered.user.id);
    assert_eq!(claims.roles, vec![harness.default_role_id]);

    let logged_in = harness
        .auth
        .login(login_request("alice", "password123"))
        .await
        .unwrap();

    assert_eq!(logged_in.user.id, registered.user.id);
    assert!(logged_in.user.last_login.is_some());

    let claims = harness
        .tokens
        .validate(&logged_in.tokens.access_token)
        .unwrap();
    assert_eq!(claims.sub, registered.user.id);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let harness = setup().await;

    register_user(&harness, "alice", "a@x.com", "password123").await;

    let result = harness
        .auth
        .register(register_request("alice", "b@x.com", "password456"))
        .await;

    assert!(matches!(result, Err(ServiceError::DuplicateIdentity)));
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let harness = setup().await;

    register_user(&harness, "alice", "a@x.com", "password123").await;

    let result = harness
        .auth
        .register(register_request("bob", "a@x.com", "password456"))
        .await;

    assert!(matches!(result, Err(ServiceError::DuplicateIdentity)));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let harness = setup().await;

    register_user(&harness, "alice", "a@x.com", "pw123long").await;

    let result = harness.auth.login(login_request("alice", "wrongpw")).await;

    assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_unknown_user() {
    let harness = setup().await;

    let result = harness
        .auth
        .login(login_request("nobody", "password123"))
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_disabled_account() {
    let harness = setup().await;

    let registered = register_user(&harness, "alice", "a@x.com", "pw123long").await;

    harness
        .store
        .set_user_active(registered.user.id, false)
        .await
        .unwrap();

    // Correct credentials on a disabled account surface the account state
    let result = harness
        .auth
        .login(login_request("alice", "pw123long"))
        .await;
    assert!(matches!(result, Err(ServiceError::AccountDisabled)));

    // Wrong credentials stay low-information regardless of account state
    let result = harness.auth.login(login_request("alice", "wrongpw")).await;
    assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_register_rejects_malformed_email() {
    let harness = setup().await;

    let result = harness
        .auth
        .register(register_request("alice", "not-an-email", "password123"))
        .await;

    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let harness = setup().await;

    let result = harness
        .auth
        .register(register_request("alice", "a@x.com", "short"))
        .await;

    assert!(matches!(result, Err(ServiceError::Validation(_))));
}
