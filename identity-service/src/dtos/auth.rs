use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{AuthProvider, UserSummary};
use crate::services::TokenResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile handed over by the OAuth collaborator after a completed external
/// authentication. Redirect/callback transport happens elsewhere.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalIdentity {
    pub provider: AuthProvider,
    /// Provider-assigned stable subject identifier.
    pub subject: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
}

impl ExternalIdentity {
    /// Username for a freshly reconciled principal: the display name when the
    /// provider sent one, otherwise the email.
    pub fn synthesized_username(&self) -> String {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
            .to_string()
    }
}

/// Success payload for register/login/refresh: sanitized principal plus the
/// issued token envelope.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserSummary,
    pub tokens: TokenResponse,
}
