use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use coursely_core::{AppError, AppResult, StoreOperation};
use coursely_domain::{EmailAddress, ExternalId, Profile, ProfileContact, ProfileId, Role};

use crate::{ProfileRepository, ProfileUpsert, UpsertOutcome, UpsertedProfile};

/// Map-backed profile store that counts writes and can be told to fail.
#[derive(Default)]
pub(crate) struct FakeProfileRepository {
    rows: Mutex<HashMap<String, Profile>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
    fail_lookups: AtomicBool,
}

impl FakeProfileRepository {
    pub(crate) fn failing() -> Self {
        let repository = Self::default();
        repository.fail_writes.store(true, Ordering::SeqCst);
        repository
    }

    pub(crate) fn unreadable() -> Self {
        let repository = Self::default();
        repository.fail_lookups.store(true, Ordering::SeqCst);
        repository
    }

    pub(crate) fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) async fn row_count(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub(crate) async fn seed(&self, external_id: &str, email: &str, role: Role) {
        let now = Utc::now();
        let profile = Profile {
            id: ProfileId::new(),
            external_id: external_id_of(external_id),
            contact: contact_of(email),
            role,
            email_verified: true,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().await.insert(external_id.to_owned(), profile);
    }

    fn check_writable(&self, operation: StoreOperation, external_id: &ExternalId) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::persistence(
                operation,
                external_id.as_str(),
                "connection refused",
            ));
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for FakeProfileRepository {
    async fn find_by_external_id(&self, external_id: &ExternalId) -> AppResult<Option<Profile>> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(AppError::persistence(
                StoreOperation::Lookup,
                external_id.as_str(),
                "connection refused",
            ));
        }

        Ok(self.rows.lock().await.get(external_id.as_str()).cloned())
    }

    async fn upsert(&self, command: ProfileUpsert) -> AppResult<UpsertedProfile> {
        self.check_writable(StoreOperation::Upsert, &command.external_id)?;

        let mut rows = self.rows.lock().await;
        let now = Utc::now();
        let key = command.external_id.as_str().to_owned();

        if let Some(existing) = rows.get_mut(&key) {
            let outcome = if existing.contact == command.contact {
                UpsertOutcome::Unchanged
            } else {
                existing.contact = command.contact;
                existing.updated_at = now;
                UpsertOutcome::Updated
            };

            return Ok(UpsertedProfile {
                profile: existing.clone(),
                outcome,
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
        rows.insert(key, profile.clone());

        Ok(UpsertedProfile {
            profile,
            outcome: UpsertOutcome::Created,
        })
    }

    async fn delete(&self, external_id: &ExternalId) -> AppResult<bool> {
        self.check_writable(StoreOperation::Delete, external_id)?;
        Ok(self.rows.lock().await.remove(external_id.as_str()).is_some())
    }

    async fn update_role(
        &self,
        external_id: &ExternalId,
        role: Role,
    ) -> AppResult<Option<Profile>> {
        self.check_writable(StoreOperation::UpdateRole, external_id)?;

        let mut rows = self.rows.lock().await;
        Ok(rows.get_mut(external_id.as_str()).map(|profile| {
            profile.role = role;
            profile.updated_at = Utc::now();
            profile.clone()
        }))
    }
}

pub(crate) fn external_id_of(value: &str) -> ExternalId {
    ExternalId::new(value).unwrap_or_else(|error| panic!("invalid test external id: {error}"))
}

pub(crate) fn contact_of(email: &str) -> ProfileContact {
    let email =
        EmailAddress::new(email).unwrap_or_else(|error| panic!("invalid test email: {error}"));
    ProfileContact::new(email, None, None, None)
}
