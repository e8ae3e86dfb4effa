use std::sync::Arc;

use async_trait::async_trait;

use crate::models::Role;
use crate::services::ServiceError;
use crate::store::IdentityStore;

/// Capability for resolving the role new registrants receive. Injected into
/// the reconciliation engine so it has no coupling to how defaults are
/// stored.
#[async_trait]
pub trait DefaultRoleResolver: Send + Sync {
    /// The role to attach to a newly created principal, if one is
    /// designated.
    async fn resolve(&self) -> Result<Option<Role>, ServiceError>;
}

/// Store-backed resolver: the role flagged as the system default.
pub struct StoreDefaultRoleResolver {
    store: Arc<dyn IdentityStore>,
}

impl StoreDefaultRoleResolver {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DefaultRoleResolver for StoreDefaultRoleResolver {
    async fn resolve(&self) -> Result<Option<Role>, ServiceError> {
        Ok(self.store.find_default_role().await?)
    }
}
