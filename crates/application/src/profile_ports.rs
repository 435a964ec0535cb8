//! Profile store port.

use async_trait::async_trait;

use coursely_core::AppResult;
use coursely_domain::{ExternalId, Profile, ProfileContact, Role};

/// Insert-or-update command for one external identity.
#[derive(Debug, Clone)]
pub struct ProfileUpsert {
    /// Conflict target.
    pub external_id: ExternalId,
    /// Contact fields written on insert and on update.
    pub contact: ProfileContact,
    /// Role stored only when the row is inserted.
    pub initial_role: Role,
    /// Verification flag stored only when the row is inserted.
    pub initial_email_verified: bool,
}

/// Which transition an upsert applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// `absent -> present`: a new row was inserted.
    Created,
    /// `present -> present` with at least one contact field changed.
    Updated,
    /// `present -> present` with identical contact fields.
    Unchanged,
}

impl UpsertOutcome {
    /// Returns a stable name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Row state after an upsert committed.
#[derive(Debug, Clone)]
pub struct UpsertedProfile {
    /// Profile as stored after the write.
    pub profile: Profile,
    /// Applied transition.
    pub outcome: UpsertOutcome,
}

/// Repository port for profile persistence.
///
/// Implementations must guarantee at most one row per external id and must
/// apply [`ProfileRepository::upsert`] as one atomic conditional write.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a profile by external id. Absence is `Ok(None)`, not an error.
    async fn find_by_external_id(&self, external_id: &ExternalId) -> AppResult<Option<Profile>>;

    /// Inserts a profile or updates its contact fields, atomically.
    ///
    /// Role and verification flag of an existing row are never modified.
    async fn upsert(&self, command: ProfileUpsert) -> AppResult<UpsertedProfile>;

    /// Hard-deletes a profile. Returns whether a row was removed.
    async fn delete(&self, external_id: &ExternalId) -> AppResult<bool>;

    /// Changes the role of an existing profile, returning the updated row.
    async fn update_role(&self, external_id: &ExternalId, role: Role)
    -> AppResult<Option<Profile>>;
}
