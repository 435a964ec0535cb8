use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use coursely_application::{ProfileRepository, ProfileUpsert, UpsertOutcome, UpsertedProfile};
use coursely_core::AppResult;
use coursely_domain::{ExternalId, Profile, ProfileId, Role};

/// In-memory profile repository implementation.
///
/// Keyed by external id; each write runs under one write lock, which gives
/// the same single-row guarantee as the unique constraint in PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl InMemoryProfileRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored profiles.
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    /// Returns whether no profile is stored.
    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_external_id(&self, external_id: &ExternalId) -> AppResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(external_id.as_str()).cloned())
    }

    async fn upsert(&self, command: ProfileUpsert) -> AppResult<UpsertedProfile> {
        let mut profiles = self.profiles.write().await;
        let now = Utc::now();

        if let Some(existing) = profiles.get_mut(command.external_id.as_str()) {
            if existing.contact == command.contact {
                return Ok(UpsertedProfile {
                    profile: existing.clone(),
                    outcome: UpsertOutcome::Unchanged,
                });
            }

            existing.contact = command.contact;
            existing.updated_at = now;
            return Ok(UpsertedProfile {
                profile: existing.clone(),
                outcome: UpsertOutcome::Updated,
            });
        }

        let profile = Profile {
            id: ProfileId::new(),
            external_id: command.external_id,
            contact: command.contact,
            role: command.initial_role,
            email_verified: command.initial_email_verified,
            created_at: now,
            updated_at: now,
        };
        profiles.insert(profile.external_id.as_str().to_owned(), profile.clone());

        Ok(UpsertedProfile {
            profile,
            outcome: UpsertOutcome::Created,
        })
    }

    async fn delete(&self, external_id: &ExternalId) -> AppResult<bool> {
        Ok(self
            .profiles
            .write()
            .await
            .remove(external_id.as_str())
            .is_some())
    }

    async fn update_role(
        &self,
        external_id: &ExternalId,
        role: Role,
    ) -> AppResult<Option<Profile>> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.get_mut(external_id.as_str()).map(|profile| {
            profile.role = role;
            profile.updated_at = Utc::now();
            profile.clone()
        }))
    }
}
