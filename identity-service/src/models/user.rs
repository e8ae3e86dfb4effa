//! User model - platform principals across local and external providers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authentication provider that vouched for a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Local,
    Google,
    Github,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "local",
            AuthProvider::Google => "google",
            AuthProvider::Github => "github",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, AuthProvider::Local)
    }
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(AuthProvider::Local),
            "google" => Ok(AuthProvider::Google),
            "github" => Ok(AuthProvider::Github),
            _ => Err(format!("Unknown auth provider: {}", s)),
        }
    }
}

/// A principal. Username and email are unique platform-wide; for external
/// principals `(provider, external_subject)` is unique within the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Present for local principals, absent for provider-backed ones.
    pub password_hash: Option<String>,
    pub active: bool,
    pub email_verified: bool,
    pub roles: Vec<Uuid>,
    pub organizations: Vec<Uuid>,
    pub provider: AuthProvider,
    pub external_subject: Option<String>,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a local principal from a hashed credential.
    pub fn new_local(
        username: String,
        email: String,
        password_hash: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash: Some(password_hash),
            active: true,
            email_verified: false,
            roles: Vec::new(),
            organizations: Vec::new(),
            provider: AuthProvider::Local,
            external_subject: None,
            display_name: None,
            first_name,
            last_name,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }

    /// Create a principal vouched for by an external provider. The provider
    /// has already verified the email.
    pub fn new_external(
        username: String,
        email: String,
        provider: AuthProvider,
        external_subject: String,
        display_name: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash: None,
            active: true,
            email_verified: true,
            roles: Vec::new(),
            organizations: Vec::new(),
            provider,
            external_subject: Some(external_subject),
            display_name,
            first_name,
            last_name,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Convert to sanitized summary (no credential material).
    pub fn summary(&self) -> UserSummary {
        UserSummary::from(self.clone())
    }
}

/// Principal summary handed upward (without sensitive fields).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub active: bool,
    pub email_verified: bool,
    pub roles: Vec<Uuid>,
    pub organizations: Vec<Uuid>,
    pub provider: AuthProvider,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            active: u.active,
            email_verified: u.email_verified,
            roles: u.roles,
            organizations: u.organizations,
            provider: u.provider,
            display_name: u.display_name,
            created_at: u.created_at,
            last_login: u.last_login,
        }
    }
}
