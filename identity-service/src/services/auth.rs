use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::dtos::{AuthResponse, ExternalIdentity, LoginRequest, RegisterRequest};
use crate::models::User;
use crate::services::{
    DefaultRoleResolver, ProviderRegistry, ServiceError, TokenResponse, TokenService,
};
use crate::store::IdentityStore;
use crate::utils::{hash_password, verify_password, Password, PasswordHashString};

/// Identity reconciliation engine: maps a credential or external identity
/// event to exactly one principal, then issues a token for it.
pub struct AuthService {
    store: Arc<dyn IdentityStore>,
    tokens: TokenService,
    default_role: Arc<dyn DefaultRoleResolver>,
    providers: ProviderRegistry,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        tokens: TokenService,
        default_role: Arc<dyn DefaultRoleResolver>,
        providers: ProviderRegistry,
    ) -> Self {
        Self {
            store,
            tokens,
            default_role,
            providers,
        }
    }

    /// Register a local principal. Username and email are checked with a
    /// single combined lookup; the insert still goes through the store's
    /// uniqueness verdict, so a lost creation race also surfaces as
    /// `DuplicateIdentity`.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, ServiceError> {
        req.validate()?;

        if self
            .store
            .find_user_by_username_or_email(&req.username, &req.email)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateIdentity);
        }

        let password_hash = hash_password(&Password::new(req.password))?;

        let mut user = User::new_local(
            req.username,
            req.email,
            password_hash.into_string(),
            req.first_name,
            req.last_name,
        );

        if let Some(role) = self.default_role.resolve().await? {
            user.roles.push(role.id);
        }

        self.store.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");

        self.issue_response(user)
    }

    /// Authenticate a local principal. Missing record, missing hash and
    /// failed verification all collapse to `InvalidCredentials`; the active
    /// flag is only consulted once the credential itself checked out.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, ServiceError> {
        req.validate()?;

        let mut user = self
            .store
            .find_local_user_by_username(&req.username)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let stored_hash = user
            .password_hash
            .clone()
            .ok_or(ServiceError::InvalidCredentials)?;

        let verified = verify_password(
            &Password::new(req.password),
            &PasswordHashString::new(stored_hash),
        )
        .map_err(|_| ServiceError::InvalidCredentials)?;

        if !verified {
            return Err(ServiceError::InvalidCredentials);
        }

        if !user.is_active() {
            return Err(ServiceError::AccountDisabled);
        }

        let now = Utc::now();
        self.store.update_last_login(user.id, now).await?;
        user.last_login = Some(now);

        tracing::info!(user_id = %user.id, "User logged in");

        self.issue_response(user)
    }

    /// Reconcile a completed external authentication to exactly one
    /// principal, creating one when absent. Returns the auth payload and
    /// whether the principal was created.
    pub async fn login_external(
        &self,
        identity: ExternalIdentity,
    ) -> Result<(AuthResponse, bool), ServiceError> {
        self.providers.require(identity.provider)?;

        // Both predicates: providers rotate the user-visible email while the
        // subject identifier stays stable.
        let existing = self
            .store
            .find_user_by_external_identity(identity.provider, &identity.subject, &identity.email)
            .await?;

        if let Some(mut user) = existing {
            let now = Utc::now();
            self.store.update_last_login(user.id, now).await?;
            user.last_login = Some(now);

            tracing::info!(user_id = %user.id, provider = %identity.provider, "External login");

            return Ok((self.issue_response(user)?, false));
        }

        let mut user = User::new_external(
            identity.synthesized_username(),
            identity.email,
            identity.provider,
            identity.subject,
            identity.display_name,
            identity.first_name,
            identity.last_name,
        );
        // The creation event is itself a login
        user.last_login = Some(user.created_at);

        if let Some(role) = self.default_role.resolve().await? {
            user.roles.push(role.id);
        }

        self.store.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, provider = %user.provider, "Principal created from external identity");

        Ok((self.issue_response(user)?, true))
    }

    /// Exchange a valid, unexpired token for a fresh one with a newly
    /// computed expiry. The principal must still exist and be active;
    /// issuance is skipped for a disabled principal.
    pub async fn refresh(&self, token: &str) -> Result<AuthResponse, ServiceError> {
        let claims = self.tokens.validate(token)?;

        let user = self
            .store
            .find_user_by_id(claims.sub)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        if !user.is_active() {
            return Err(ServiceError::AccountDisabled);
        }

        tracing::info!(user_id = %user.id, "Token refreshed");

        self.issue_response(user)
    }

    fn issue_response(&self, user: User) -> Result<AuthResponse, ServiceError> {
        let access_token = self.tokens.issue(&user)?;

        Ok(AuthResponse {
            tokens: TokenResponse::bearer(access_token, self.tokens.access_token_expiry_seconds()),
            user: user.summary(),
        })
    }
}
