use serde::Deserialize;
use serde_json::Value;

use coursely_core::{AppError, AppResult};
use coursely_domain::{EmailAddress, ExternalId, ProfileContact};

use crate::SyncRequest;

/// Discriminated event envelope `{type, data}`.
#[derive(Debug, Deserialize)]
pub(super) struct EventEnvelope {
    #[serde(rename = "type")]
    pub(super) event_type: String,
    #[serde(default)]
    pub(super) data: Value,
}

impl EventEnvelope {
    pub(super) fn parse(payload: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(payload).map_err(|error| {
            AppError::Validation(format!("webhook payload is not a valid event: {error}"))
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct EmailAddressEntry {
    #[serde(default)]
    pub(super) id: Option<String>,
    #[serde(default)]
    pub(super) email_address: Option<String>,
    #[serde(default)]
    verification: Option<EmailVerification>,
}

impl EmailAddressEntry {
    fn verified_claim(&self) -> Option<bool> {
        self.verification
            .as_ref()
            .and_then(|verification| verification.status.as_deref())
            .map(|status| status == "verified")
    }
}

#[derive(Debug, Deserialize)]
struct EmailVerification {
    #[serde(default)]
    status: Option<String>,
}

/// `data` of `user.created` and `user.updated`.
#[derive(Debug, Deserialize)]
pub(super) struct UserEventData {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailAddressEntry>,
    #[serde(default)]
    primary_email_address_id: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

impl UserEventData {
    pub(super) fn from_data(data: Value) -> AppResult<Self> {
        serde_json::from_value(data).map_err(|error| {
            AppError::Validation(format!("user event data is malformed: {error}"))
        })
    }

    pub(super) fn into_sync_request(self) -> AppResult<SyncRequest> {
        let external_id = ExternalId::new(self.id)?;
        let primary = select_primary_email(
            &self.email_addresses,
            self.primary_email_address_id.as_deref(),
        )
        .ok_or_else(|| {
            AppError::Validation(format!("user '{external_id}' has no email address"))
        })?;

        let address = primary.email_address.clone().ok_or_else(|| {
            AppError::Validation(format!("user '{external_id}' has no email address"))
        })?;
        let contact = ProfileContact::new(
            EmailAddress::new(address)?,
            self.first_name,
            self.last_name,
            self.image_url,
        );

        Ok(SyncRequest {
            external_id,
            contact,
            email_verified_claim: primary.verified_claim(),
        })
    }
}

/// `data` of `user.deleted`.
#[derive(Debug, Deserialize)]
pub(super) struct DeletedUserData {
    #[serde(default)]
    id: Option<String>,
}

impl DeletedUserData {
    pub(super) fn external_id(data: Value) -> AppResult<ExternalId> {
        let deleted: Self = serde_json::from_value(data).map_err(|error| {
            AppError::Validation(format!("user.deleted data is malformed: {error}"))
        })?;

        ExternalId::new(deleted.id.unwrap_or_default())
    }
}

/// Picks the address whose id equals the declared primary id.
///
/// Falls back to the first entry in source order when nothing matches or the
/// matching entry carries no address. The fallback may pick a secondary
/// address if the provider omits or changes the primary id, so callers should
/// treat it as best effort.
pub(super) fn select_primary_email<'a>(
    entries: &'a [EmailAddressEntry],
    primary_id: Option<&str>,
) -> Option<&'a EmailAddressEntry> {
    primary_id
        .and_then(|primary_id| {
            entries
                .iter()
                .find(|entry| entry.id.as_deref() == Some(primary_id))
        })
        .filter(|entry| entry.email_address.is_some())
        .or_else(|| entries.first())
}
