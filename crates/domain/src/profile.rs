//! Profile entity keyed by the identity provider's user id.

use chrono::{DateTime, Utc};
use coursely_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EmailAddress, Role};

/// Internal surrogate identifier of a profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(Uuid);

impl ProfileId {
    /// Creates a new random profile identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a profile identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Stable user id assigned by the external identity provider.
///
/// Immutable once a profile is created; it is the conflict target of every
/// sync write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalId(NonEmptyString);

impl ExternalId {
    /// Creates a validated external id. Surrounding whitespace is dropped.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        NonEmptyString::new(value.trim()).map(Self)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ExternalId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Mutable contact fields written by sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileContact {
    email: EmailAddress,
    first_name: Option<String>,
    last_name: Option<String>,
    avatar_url: Option<String>,
}

impl ProfileContact {
    /// Creates contact fields, treating blank optional values as absent.
    #[must_use]
    pub fn new(
        email: EmailAddress,
        first_name: Option<String>,
        last_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            email,
            first_name: non_blank(first_name),
            last_name: non_blank(last_name),
            avatar_url: non_blank(avatar_url),
        }
    }

    /// Returns the canonical email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the first name, if known.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Returns the last name, if known.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns the avatar URL, if known.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// How much the origin of a sync request is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrust {
    /// Payload verified against the provider's webhook signing secret.
    SignedWebhook,
    /// Fields supplied by a browser without any signature.
    UnverifiedClient,
}

impl SyncTrust {
    /// Returns a stable name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignedWebhook => "signed_webhook",
            Self::UnverifiedClient => "unverified_client",
        }
    }

    /// Resolves the verification flag stored on a newly created profile.
    ///
    /// A signed delivery is taken at its word: the provider's own verification
    /// status when it sent one, verified otherwise. Client-supplied fields are
    /// never enough to mark an address verified.
    #[must_use]
    pub fn initial_email_verified(&self, provider_claim: Option<bool>) -> bool {
        match self {
            Self::SignedWebhook => provider_claim.unwrap_or(true),
            Self::UnverifiedClient => false,
        }
    }
}

/// Persisted user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Internal surrogate id.
    pub id: ProfileId,
    /// Identity provider id.
    pub external_id: ExternalId,
    /// Contact fields maintained by sync.
    pub contact: ProfileContact,
    /// Platform role; never written by sync after creation.
    pub role: Role,
    /// Whether the email address is known to be verified.
    pub email_verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last contact or role change.
    pub updated_at: DateTime<Utc>,
}
