use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dtos::CreateOrganizationRequest;
use crate::models::Organization;
use crate::services::ServiceError;
use crate::store::IdentityStore;

/// Outcome of an advisory, non-blocking mutation: membership bookkeeping
/// that follows an authoritative write. Returned so callers can log it;
/// never turned into an operation failure.
#[derive(Debug, Default)]
#[must_use]
pub struct Advisory {
    /// Principal records actually updated.
    pub applied: usize,
    pub errors: Vec<String>,
}

impl Advisory {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Organization membership manager: organization lifecycle plus the
/// many-to-many principal/organization relationship.
pub struct MembershipService {
    store: Arc<dyn IdentityStore>,
}

impl MembershipService {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Create an organization. The creator becomes admin when no explicit
    /// admin list is given. Admins' own organization sets are brought in
    /// line as an advisory step after the authoritative insert.
    pub async fn create_organization(
        &self,
        req: CreateOrganizationRequest,
        creator: Uuid,
    ) -> Result<(Organization, Advisory), ServiceError> {
        req.validate()?;

        let admins = if req.admins.is_empty() {
            vec![creator]
        } else {
            req.admins
        };

        let org = Organization::new(req.name, req.domain, admins);
        self.store.insert_organization(&org).await?;

        tracing::info!(org_id = %org.id, name = %org.name, "Organization created");

        let mut advisory = Advisory::default();
        for admin in &org.admins {
            match self.store.add_user_organization(*admin, org.id).await {
                Ok(true) => advisory.applied += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(org_id = %org.id, user_id = %admin, error = %e,
                        "Advisory admin membership update failed");
                    advisory.errors.push(e.to_string());
                }
            }
        }

        Ok((org, advisory))
    }

    /// Add a principal to an organization. Idempotent: re-adding an existing
    /// member is a no-op. Supplied role ids are unioned into the principal's
    /// role set.
    pub async fn add_member(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        role_ids: Option<Vec<Uuid>>,
    ) -> Result<(), ServiceError> {
        self.store
            .find_organization_by_id(org_id)
            .await?
            .ok_or(ServiceError::NotFound("organization"))?;
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        self.store.add_user_organization(user_id, org_id).await?;

        if let Some(roles) = role_ids.filter(|r| !r.is_empty()) {
            self.store.add_user_roles(user_id, &roles).await?;
        }

        tracing::info!(org_id = %org_id, user_id = %user_id, "Member added");

        Ok(())
    }

    /// Remove a principal from an organization. Fails `NotFound` when the
    /// principal is absent or not currently a member.
    pub async fn remove_member(&self, org_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        if !user.organizations.contains(&org_id) {
            return Err(ServiceError::NotFound("membership"));
        }

        self.store.remove_user_organization(user_id, org_id).await?;

        tracing::info!(org_id = %org_id, user_id = %user_id, "Member removed");

        Ok(())
    }

    /// Delete an organization. The deletion is authoritative; the membership
    /// sweep that follows is advisory, and a sweep failure never rolls the
    /// deletion back.
    pub async fn delete_organization(&self, org_id: Uuid) -> Result<Advisory, ServiceError> {
        let deleted = self.store.delete_organization(org_id).await?;
        if !deleted {
            return Err(ServiceError::NotFound("organization"));
        }

        tracing::info!(org_id = %org_id, "Organization deleted");

        let mut advisory = Advisory::default();
        match self.store.remove_organization_from_all_users(org_id).await {
            Ok(touched) => advisory.applied = touched as usize,
            Err(e) => {
                tracing::warn!(org_id = %org_id, error = %e,
                    "Membership sweep after organization deletion failed");
                advisory.errors.push(e.to_string());
            }
        }

        Ok(advisory)
    }

    pub async fn member_count(&self, org_id: Uuid) -> Result<u64, ServiceError> {
        self.store
            .find_organization_by_id(org_id)
            .await?
            .ok_or(ServiceError::NotFound("organization"))?;

        Ok(self.store.count_organization_members(org_id).await?)
    }
}
