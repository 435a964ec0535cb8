//! Role-derived capability checks.
//!
//! Every privileged surface (learner dashboard, instructor authoring, admin
//! moderation) calls [`AccessService::require_capability`] before rendering or
//! mutating anything.

use std::sync::Arc;

use tracing::{info, warn};

use coursely_core::{AppError, AppResult};
use coursely_domain::{Capability, ExternalId, Profile, Role};

use crate::ProfileRepository;

/// Application service for capability gating and role management.
#[derive(Clone)]
pub struct AccessService {
    repository: Arc<dyn ProfileRepository>,
}

impl AccessService {
    /// Creates a new access service.
    #[must_use]
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    /// Returns the profile of an identity.
    pub async fn profile(&self, external_id: &ExternalId) -> AppResult<Profile> {
        self.repository
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no profile for '{external_id}'")))
    }

    /// Ensures the identity's role grants the capability.
    ///
    /// An identity without a synced profile is unauthorized rather than
    /// forbidden: the caller should sync and retry.
    pub async fn require_capability(
        &self,
        external_id: &ExternalId,
        capability: Capability,
    ) -> AppResult<Profile> {
        let profile = self
            .repository
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized(format!("identity '{external_id}' has no synced profile"))
            })?;

        if !profile.role.grants(capability) {
            warn!(
                external_id = %external_id,
                role = profile.role.as_str(),
                capability = capability.as_str(),
                "capability denied"
            );
            return Err(AppError::Forbidden(format!(
                "role '{}' does not grant '{}'",
                profile.role.as_str(),
                capability.as_str()
            )));
        }

        Ok(profile)
    }

    /// Changes another profile's role on behalf of an actor holding
    /// [`Capability::ManageRoles`].
    pub async fn assign_role(
        &self,
        actor: &ExternalId,
        target: &ExternalId,
        role: Role,
    ) -> AppResult<Profile> {
        self.require_capability(actor, Capability::ManageRoles)
            .await?;

        if actor == target {
            return Err(AppError::Conflict(
                "an administrator cannot change their own role".to_owned(),
            ));
        }

        let profile = self
            .repository
            .update_role(target, role)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no profile for '{target}'")))?;

        info!(
            actor = %actor,
            target = %target,
            role = role.as_str(),
            "profile role changed"
        );

        Ok(profile)
    }
}
