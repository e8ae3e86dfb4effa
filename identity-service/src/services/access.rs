use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Permission, User};
use crate::services::ServiceError;
use crate::store::IdentityStore;

/// Access resolution engine: role set + organization context → effective
/// permission set. Read-only; one store round-trip for roles, one for
/// permissions.
pub struct AccessService {
    store: Arc<dyn IdentityStore>,
}

impl AccessService {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Union of the permissions attached to the given roles, filtered to
    /// system defaults and grants scoped to the requested organization. A
    /// grant scoped to org X is never visible for org Y or the global
    /// context. An empty role set resolves to the empty set, never an
    /// error. Deduplicated and deterministically ordered, so resolution is
    /// idempotent.
    pub async fn resolve(
        &self,
        role_ids: &[Uuid],
        organization: Option<Uuid>,
    ) -> Result<Vec<Permission>, ServiceError> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let roles = self.store.find_roles_by_ids(role_ids).await?;

        let mut seen = BTreeSet::new();
        let mut permission_ids = Vec::new();
        for role in &roles {
            for id in &role.permissions {
                if seen.insert(*id) {
                    permission_ids.push(*id);
                }
            }
        }

        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut permissions: Vec<Permission> = self
            .store
            .find_permissions_by_ids(&permission_ids)
            .await?
            .into_iter()
            .filter(|p| p.applies_to(organization))
            .collect();

        permissions.sort_by(|a, b| {
            (a.resource.as_str(), a.action.as_str()).cmp(&(b.resource.as_str(), b.action.as_str()))
        });

        Ok(permissions)
    }

    pub async fn resolve_for_user(
        &self,
        user: &User,
        organization: Option<Uuid>,
    ) -> Result<Vec<Permission>, ServiceError> {
        self.resolve(&user.roles, organization).await
    }

    /// Membership check: does any effective permission grant
    /// (resource, action) in this context?
    pub async fn has_permission(
        &self,
        role_ids: &[Uuid],
        resource: &str,
        action: &str,
        organization: Option<Uuid>,
    ) -> Result<bool, ServiceError> {
        let permissions = self.resolve(role_ids, organization).await?;
        Ok(permissions
            .iter()
            .any(|p| p.resource == resource && p.action == action))
    }
}
