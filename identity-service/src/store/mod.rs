//! Persistent store boundary.
//!
//! The engine consumes the store through this trait only: point lookups by
//! unique key, compound OR lookups, inserts, partial field updates, set
//! add/pull membership mutations, and a member count. Each operation is
//! individually atomic; no cross-collection transactions are assumed.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AuthProvider, Organization, Permission, Role, User};

/// Store failures as the engine sees them. Uniqueness verdicts come back as
/// `Conflict`; everything else is `Unavailable`. The engine never inspects
/// driver-level error details.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    // ==================== User operations ====================

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Combined uniqueness probe: matches when either the username or the
    /// email is already taken, compared exactly as stored.
    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>>;

    /// Point lookup on `(username, provider = Local)`.
    async fn find_local_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Compound lookup on `(email, provider) OR (external_subject, provider)`.
    /// Providers rotate user-visible emails, so both predicates are checked.
    async fn find_user_by_external_identity(
        &self,
        provider: AuthProvider,
        subject: &str,
        email: &str,
    ) -> StoreResult<Option<User>>;

    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn update_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;

    async fn set_user_active(&self, user_id: Uuid, active: bool) -> StoreResult<()>;

    /// Set-add: re-adding an organization the principal already has is a
    /// no-op, not an error.
    async fn add_user_organization(&self, user_id: Uuid, org_id: Uuid) -> StoreResult<bool>;

    /// Set-pull. Returns whether the organization was present.
    async fn remove_user_organization(&self, user_id: Uuid, org_id: Uuid) -> StoreResult<bool>;

    /// Union the given role ids into the principal's role set.
    async fn add_user_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> StoreResult<()>;

    // ==================== Role operations ====================

    async fn insert_role(&self, role: &Role) -> StoreResult<()>;

    async fn find_roles_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Role>>;

    /// The role flagged as the system default for new local registrants.
    async fn find_default_role(&self) -> StoreResult<Option<Role>>;

    // ==================== Permission operations ====================

    async fn insert_permission(&self, permission: &Permission) -> StoreResult<()>;

    async fn find_permissions_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Permission>>;

    // ==================== Organization operations ====================

    async fn insert_organization(&self, org: &Organization) -> StoreResult<()>;

    async fn find_organization_by_id(&self, id: Uuid) -> StoreResult<Option<Organization>>;

    /// Returns whether an organization was actually deleted.
    async fn delete_organization(&self, id: Uuid) -> StoreResult<bool>;

    /// Pull the organization id from every principal's organization set.
    /// Returns the number of principals touched.
    async fn remove_organization_from_all_users(&self, org_id: Uuid) -> StoreResult<u64>;

    async fn count_organization_members(&self, org_id: Uuid) -> StoreResult<u64>;
}
