//! Role model - named permission bundles, optionally organization-scoped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A role referenced by principals. Roles are created administratively and
/// never duplicated per principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub permissions: Vec<Uuid>,
    /// Assigned automatically to new local registrants.
    pub is_default: bool,
    /// None = global role.
    pub organization: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: String, organization: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            permissions: Vec::new(),
            is_default: false,
            organization,
            created_at: Utc::now(),
        }
    }

    pub fn with_permissions(mut self, permissions: Vec<Uuid>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}
