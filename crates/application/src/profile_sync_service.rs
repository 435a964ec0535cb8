//! Shared profile sync used by the webhook receiver and the client sync API.
//!
//! Both entry points funnel into [`ProfileSyncService::sync`], so defaults for
//! new rows (role, verification flag) are decided in exactly one place.

use std::sync::Arc;

use tracing::{error, info};

use coursely_core::{AppError, AppResult};
use coursely_domain::{ExternalId, ProfileContact, Role, SyncTrust};

use crate::{ProfileRepository, ProfileUpsert, UpsertedProfile};

/// Identity attributes to reconcile into the profile store.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Identity provider user id.
    pub external_id: ExternalId,
    /// Contact fields to write.
    pub contact: ProfileContact,
    /// Provider-reported verification status of the selected email, if any.
    pub email_verified_claim: Option<bool>,
}

/// Application service owning identity-linked profile writes.
#[derive(Clone)]
pub struct ProfileSyncService {
    repository: Arc<dyn ProfileRepository>,
}

impl ProfileSyncService {
    /// Creates a new sync service.
    #[must_use]
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    /// Creates or refreshes the profile for one external identity.
    ///
    /// Idempotent: replaying the same request leaves one row with the same
    /// contact fields and reports [`crate::UpsertOutcome::Unchanged`].
    pub async fn sync(&self, request: SyncRequest, trust: SyncTrust) -> AppResult<UpsertedProfile> {
        let external_id = request.external_id.clone();
        let command = ProfileUpsert {
            external_id: request.external_id,
            contact: request.contact,
            initial_role: Role::default(),
            initial_email_verified: trust.initial_email_verified(request.email_verified_claim),
        };

        match self.repository.upsert(command).await {
            Ok(upserted) => {
                info!(
                    external_id = %external_id,
                    profile_id = %upserted.profile.id,
                    trust = trust.as_str(),
                    outcome = upserted.outcome.as_str(),
                    "profile synced"
                );
                Ok(upserted)
            }
            Err(sync_error) => {
                log_store_failure(&external_id, &sync_error);
                Err(sync_error)
            }
        }
    }

    /// Removes the profile for an external identity.
    ///
    /// Removing an identity that has no profile succeeds, so provider
    /// redeliveries of a deletion are harmless.
    pub async fn remove(&self, external_id: &ExternalId) -> AppResult<bool> {
        match self.repository.delete(external_id).await {
            Ok(removed) => {
                info!(external_id = %external_id, removed, "profile removed");
                Ok(removed)
            }
            Err(delete_error) => {
                log_store_failure(external_id, &delete_error);
                Err(delete_error)
            }
        }
    }
}

fn log_store_failure(external_id: &ExternalId, failure: &AppError) {
    match failure {
        AppError::Persistence {
            operation, message, ..
        } => error!(
            external_id = %external_id,
            operation = operation.as_str(),
            detail = message.as_str(),
            "profile store operation failed"
        ),
        other => error!(external_id = %external_id, error = %other, "profile sync failed"),
    }
}
