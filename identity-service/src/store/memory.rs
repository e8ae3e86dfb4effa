//! In-memory reference store.
//!
//! Backs the test suite and doubles as the executable specification of the
//! store contract, uniqueness enforcement included: username, email and
//! `(provider, external_subject)` for users; name and domain for
//! organizations; `(resource, action, organization)` for permissions.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{AuthProvider, Organization, Permission, Role, User};

use super::{IdentityStore, StoreError, StoreResult};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    roles: HashMap<Uuid, Role>,
    permissions: HashMap<Uuid, Permission>,
    organizations: HashMap<Uuid, Organization>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Collections>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable(anyhow::anyhow!("store lock poisoned")))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Collections>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable(anyhow::anyhow!("store lock poisoned")))
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn find_local_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.provider == AuthProvider::Local && u.username == username)
            .cloned())
    }

    async fn find_user_by_external_identity(
        &self,
        provider: AuthProvider,
        subject: &str,
        email: &str,
    ) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| {
                u.provider == provider
                    && (u.email == email || u.external_subject.as_deref() == Some(subject))
            })
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut inner = self.write()?;
        for existing in inner.users.values() {
            if existing.username == user.username {
                return Err(StoreError::Conflict(format!(
                    "users.username: {}",
                    user.username
                )));
            }
            if existing.email == user.email {
                return Err(StoreError::Conflict(format!("users.email: {}", user.email)));
            }
            if !user.provider.is_local()
                && existing.provider == user.provider
                && existing.external_subject.is_some()
                && existing.external_subject == user.external_subject
            {
                return Err(StoreError::Conflict(format!(
                    "users.external_subject: {}/{}",
                    user.provider,
                    user.external_subject.as_deref().unwrap_or_default()
                )));
            }
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let mut inner = self.write()?;
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.last_login = Some(at);
            user.updated_at = at;
        }
        Ok(())
    }

    async fn set_user_active(&self, user_id: Uuid, active: bool) -> StoreResult<()> {
        let mut inner = self.write()?;
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.active = active;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn add_user_organization(&self, user_id: Uuid, org_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.write()?;
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                if user.organizations.contains(&org_id) {
                    Ok(false)
                } else {
                    user.organizations.push(org_id);
                    user.updated_at = Utc::now();
                    Ok(true)
                }
            }
            None => Ok(false),
        }
    }

    async fn remove_user_organization(&self, user_id: Uuid, org_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.write()?;
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                let before = user.organizations.len();
                user.organizations.retain(|id| *id != org_id);
                let removed = user.organizations.len() != before;
                if removed {
                    user.updated_at = Utc::now();
                }
                Ok(removed)
            }
            None => Ok(false),
        }
    }

    async fn add_user_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> StoreResult<()> {
        let mut inner = self.write()?;
        if let Some(user) = inner.users.get_mut(&user_id) {
            for role_id in role_ids {
                if !user.roles.contains(role_id) {
                    user.roles.push(*role_id);
                }
            }
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn insert_role(&self, role: &Role) -> StoreResult<()> {
        let mut inner = self.write()?;
        inner.roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn find_roles_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Role>> {
        let inner = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.roles.get(id).cloned())
            .collect())
    }

    async fn find_default_role(&self) -> StoreResult<Option<Role>> {
        Ok(self
            .read()?
            .roles
            .values()
            .find(|r| r.is_default)
            .cloned())
    }

    async fn insert_permission(&self, permission: &Permission) -> StoreResult<()> {
        let mut inner = self.write()?;
        let duplicate = inner.permissions.values().any(|p| {
            p.resource == permission.resource
                && p.action == permission.action
                && p.organization == permission.organization
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "permissions.resource_action: {}:{}",
                permission.resource, permission.action
            )));
        }
        inner.permissions.insert(permission.id, permission.clone());
        Ok(())
    }

    async fn find_permissions_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Permission>> {
        let inner = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| inner.permissions.get(id).cloned())
            .collect())
    }

    async fn insert_organization(&self, org: &Organization) -> StoreResult<()> {
        let mut inner = self.write()?;
        for existing in inner.organizations.values() {
            if existing.name == org.name {
                return Err(StoreError::Conflict(format!(
                    "organizations.name: {}",
                    org.name
                )));
            }
            if org.domain.is_some() && existing.domain == org.domain {
                return Err(StoreError::Conflict(format!(
                    "organizations.domain: {}",
                    org.domain.as_deref().unwrap_or_default()
                )));
            }
        }
        inner.organizations.insert(org.id, org.clone());
        Ok(())
    }

    async fn find_organization_by_id(&self, id: Uuid) -> StoreResult<Option<Organization>> {
        Ok(self.read()?.organizations.get(&id).cloned())
    }

    async fn delete_organization(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.write()?.organizations.remove(&id).is_some())
    }

    async fn remove_organization_from_all_users(&self, org_id: Uuid) -> StoreResult<u64> {
        let mut inner = self.write()?;
        let mut touched = 0;
        for user in inner.users.values_mut() {
            let before = user.organizations.len();
            user.organizations.retain(|id| *id != org_id);
            if user.organizations.len() != before {
                user.updated_at = Utc::now();
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn count_organization_members(&self, org_id: Uuid) -> StoreResult<u64> {
        Ok(self
            .read()?
            .users
            .values()
            .filter(|u| u.organizations.contains(&org_id))
            .count() as u64)
    }
}
