//! Permission model - (resource, action) grants with optional org scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single grant. `(resource, action, organization)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    pub resource: String,
    pub action: String,
    /// Visible to every organization without explicit scoping.
    pub is_system_default: bool,
    /// Set when the grant applies to a single organization.
    pub organization: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Permission {
    pub fn new(resource: String, action: String, organization: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource,
            action,
            is_system_default: false,
            organization,
            created_at: Utc::now(),
        }
    }

    pub fn as_system_default(mut self) -> Self {
        self.is_system_default = true;
        self
    }

    /// Whether this grant applies when resolving for the given context.
    pub fn applies_to(&self, organization: Option<Uuid>) -> bool {
        self.is_system_default || self.organization == organization
    }
}
