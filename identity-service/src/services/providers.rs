use std::collections::HashMap;

use serde::Deserialize;

use crate::models::AuthProvider;
use crate::services::ServiceError;

/// Configuration for one registered OAuth provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

/// Explicit registry of OAuth providers, built from configuration and handed
/// to the reconciliation engine at construction. No ambient global state.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<AuthProvider, ProviderConfig>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: AuthProvider, config: ProviderConfig) {
        self.providers.insert(provider, config);
    }

    pub fn with_provider(mut self, provider: AuthProvider, config: ProviderConfig) -> Self {
        self.register(provider, config);
        self
    }

    pub fn get(&self, provider: AuthProvider) -> Option<&ProviderConfig> {
        self.providers.get(&provider)
    }

    pub fn is_registered(&self, provider: AuthProvider) -> bool {
        self.providers.contains_key(&provider)
    }

    /// Lookup that fails the operation when the provider was never
    /// registered for this deployment.
    pub fn require(&self, provider: AuthProvider) -> Result<&ProviderConfig, ServiceError> {
        self.get(provider).ok_or_else(|| {
            ServiceError::Validation(format!("Provider not registered: {}", provider))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google_config() -> ProviderConfig {
        ProviderConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "https://app.example.com/callback".to_string(),
            scopes: vec!["openid".to_string(), "email".to_string()],
        }
    }

    #[test]
    fn test_registered_provider_resolves() {
        let registry = ProviderRegistry::new().with_provider(AuthProvider::Google, google_config());

        assert!(registry.is_registered(AuthProvider::Google));
        assert_eq!(
            registry.require(AuthProvider::Google).unwrap().client_id,
            "client-id"
        );
    }

    #[test]
    fn test_unregistered_provider_fails() {
        let registry = ProviderRegistry::new().with_provider(AuthProvider::Google, google_config());

        assert!(!registry.is_registered(AuthProvider::Github));
        assert!(matches!(
            registry.require(AuthProvider::Github),
            Err(ServiceError::Validation(_))
        ));
    }
}
