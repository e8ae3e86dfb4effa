//! Test helper module for identity-service integration tests.
//!
//! Builds the engine against the in-memory reference store.

#![allow(dead_code)]

use std::sync::Arc;

use uuid::Uuid;

use identity_service::config::JwtConfig;
use identity_service::dtos::{AuthResponse, ExternalIdentity, LoginRequest, RegisterRequest};
use identity_service::models::{AuthProvider, Role};
use identity_service::services::{
    AccessService, AuthService, MembershipService, ProviderConfig, ProviderRegistry,
    StoreDefaultRoleResolver, TokenService,
};
use identity_service::store::{IdentityStore, MemoryStore};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789";

pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub tokens: TokenService,
    pub auth: AuthService,
    pub access: AccessService,
    pub membership: MembershipService,
    pub default_role_id: Uuid,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_minutes: 15,
    }
}

/// Engine wired against a fresh store holding one default role ("member")
/// and a registered Google provider.
pub async fn setup() -> TestHarness {
    let store = Arc::new(MemoryStore::new());

    let default_role = Role::new("member".to_string(), None).as_default();
    store
        .insert_role(&default_role)
        .await
        .expect("Failed to seed default role");

    let tokens = TokenService::new(&test_jwt_config()).expect("Failed to create token service");

    let store_dyn: Arc<dyn IdentityStore> = store.clone();
    let resolver = Arc::new(StoreDefaultRoleResolver::new(store_dyn.clone()));
    let providers = ProviderRegistry::new().with_provider(
        AuthProvider::Google,
        ProviderConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            redirect_uri: "http://localhost:3000/auth/callback".to_string(),
            scopes: vec!["openid".to_string(), "email".to_string()],
        },
    );

    let auth = AuthService::new(store_dyn.clone(), tokens.clone(), resolver, providers);
    let access = AccessService::new(store_dyn.clone());
    let membership = MembershipService::new(store_dyn);

    TestHarness {
        store,
        tokens,
        auth,
        access,
        membership,
        default_role_id: default_role.id,
    }
}

pub fn register_request(username: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        first_name: None,
        last_name: None,
    }
}

pub fn login_request(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

pub fn google_identity(subject: &str, email: &str, display_name: Option<&str>) -> ExternalIdentity {
    ExternalIdentity {
        provider: AuthProvider::Google,
        subject: subject.to_string(),
        email: email.to_string(),
        first_name: None,
        last_name: None,
        display_name: display_name.map(|n| n.to_string()),
    }
}

pub async fn register_user(
    harness: &TestHarness,
    username: &str,
    email: &str,
    password: &str,
) -> AuthResponse {
    harness
        .auth
        .register(register_request(username, email, password))
        .await
        .expect("Registration failed")
}
