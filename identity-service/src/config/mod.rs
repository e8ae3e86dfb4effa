use identity_core::config as core_config;
use identity_core::error::CoreError;
use serde::Deserialize;
use std::env;

use crate::models::AuthProvider;
use crate::services::{ProviderConfig, ProviderRegistry};

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub google: Option<ProviderConfig>,
    pub github: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Symmetric signing secret; a configuration input, never hard-coded.
    pub secret: String,
    pub access_token_expiry_minutes: i64,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        let common = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| CoreError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = ServiceConfig {
            common,
            environment,
            jwt: JwtConfig {
                secret: get_env(
                    "JWT_SECRET",
                    Some("insecure-dev-secret-0123456789abcdef"),
                    is_prod,
                )?,
                access_token_expiry_minutes: get_env(
                    "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                    Some("15"),
                    is_prod,
                )?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    CoreError::ConfigError(anyhow::anyhow!(e.to_string()))
                })?,
            },
            google: load_provider("GOOGLE", is_prod)?,
            github: load_provider("GITHUB", is_prod)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.jwt.access_token_expiry_minutes <= 0 {
            return Err(CoreError::ConfigError(anyhow::anyhow!(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES must be positive"
            )));
        }

        if self.environment == Environment::Prod && self.jwt.secret.len() < 32 {
            return Err(CoreError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 bytes in production"
            )));
        }

        Ok(())
    }

    /// Build the provider registry handed to the reconciliation engine.
    pub fn provider_registry(&self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        if let Some(google) = &self.google {
            registry.register(AuthProvider::Google, google.clone());
        }
        if let Some(github) = &self.github {
            registry.register(AuthProvider::Github, github.clone());
        }
        registry
    }
}

/// Provider block is optional; when the client id is present the rest of the
/// block is required.
fn load_provider(prefix: &str, is_prod: bool) -> Result<Option<ProviderConfig>, CoreError> {
    if env::var(format!("{}_CLIENT_ID", prefix)).is_err() {
        return Ok(None);
    }

    Ok(Some(ProviderConfig {
        client_id: get_env(&format!("{}_CLIENT_ID", prefix), None, is_prod)?,
        client_secret: get_env(&format!("{}_CLIENT_SECRET", prefix), None, is_prod)?,
        redirect_uri: get_env(&format!("{}_REDIRECT_URI", prefix), None, is_prod)?,
        scopes: get_env(
            &format!("{}_SCOPES", prefix),
            Some("openid,email,profile"),
            is_prod,
        )?
        .split(',')
        .map(|s| s.trim().to_string())
        .collect(),
    }))
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, CoreError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(CoreError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(CoreError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
