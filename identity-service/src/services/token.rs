use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::User;
use crate::services::ServiceError;

/// Token service for issuing and validating signed identity tokens.
/// Exclusively owns signing and verification; validation is stateless and
/// consults no store.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
}

/// Claims embedded in an access token. Fixed tagged shape so claims and
/// signature are co-versioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (principal ID)
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    /// Role identifiers held at issuance
    pub roles: Vec<Uuid>,
    /// Organization identifiers held at issuance
    pub orgs: Vec<Uuid>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Token envelope returned to the caller.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

impl TokenService {
    /// Create a new token service from the configured symmetric secret.
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        if config.secret.is_empty() {
            return Err(anyhow::anyhow!("JWT secret must not be empty"));
        }
        if config.access_token_expiry_minutes <= 0 {
            return Err(anyhow::anyhow!("Access token expiry must be positive"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
        })
    }

    /// Issue a token for a principal with the configured expiry.
    pub fn issue(&self, user: &User) -> Result<String, ServiceError> {
        self.issue_with_ttl(user, Duration::minutes(self.access_token_expiry_minutes))
    }

    /// Issue a token with an explicit ttl. Deterministic apart from the
    /// time-derived fields.
    pub fn issue_with_ttl(&self, user: &User, ttl: Duration) -> Result<String, ServiceError> {
        let now = Utc::now();

        let claims = AccessClaims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            orgs: user.organizations.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key).map_err(|e| {
            ServiceError::Internal(anyhow::anyhow!("Failed to encode access token: {}", e))
        })
    }

    /// Validate and decode a token. Signature mismatch, malformed structure
    /// and expiry all collapse to `InvalidToken`.
    pub fn validate(&self, token: &str) -> Result<AccessClaims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| ServiceError::InvalidToken)
    }

    /// Get access token expiry in seconds (for client info)
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }
}
