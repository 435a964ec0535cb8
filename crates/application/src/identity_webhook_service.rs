//! Identity provider webhook intake.
//!
//! Verification failures never reach the sync service. Recognized user events
//! produce exactly one profile store write; everything else is acknowledged
//! without touching the store so the provider stops redelivering.

use std::sync::Arc;

use tracing::{info, warn};

use coursely_core::AppResult;
use coursely_domain::{ExternalId, SyncTrust};

use crate::{ProfileSyncService, UpsertOutcome, WebhookHeaders, WebhookVerifier};

mod payload;

use payload::{DeletedUserData, EventEnvelope, UserEventData};

/// User lifecycle events the receiver acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityEventKind {
    /// `user.created`
    UserCreated,
    /// `user.updated`
    UserUpdated,
    /// `user.deleted`
    UserDeleted,
}

impl IdentityEventKind {
    /// Maps a provider event type onto a recognized kind.
    #[must_use]
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "user.created" => Some(Self::UserCreated),
            "user.updated" => Some(Self::UserUpdated),
            "user.deleted" => Some(Self::UserDeleted),
            _ => None,
        }
    }

    /// Returns the provider event type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserCreated => "user.created",
            Self::UserUpdated => "user.updated",
            Self::UserDeleted => "user.deleted",
        }
    }
}

/// Result of processing one verified delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A created or updated user was reconciled into the store.
    Synced {
        /// Event that triggered the write.
        kind: IdentityEventKind,
        /// Identity that was written.
        external_id: ExternalId,
        /// Applied transition.
        outcome: UpsertOutcome,
    },
    /// A deleted user's profile was removed.
    Deleted {
        /// Identity that was removed.
        external_id: ExternalId,
        /// Whether a row existed.
        removed: bool,
    },
    /// The event type is not handled.
    Ignored {
        /// Provider event type as received.
        event_type: String,
    },
}

impl WebhookOutcome {
    /// Plain-text acknowledgement returned to the provider.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Synced {
                kind: IdentityEventKind::UserCreated,
                ..
            } => "User created successfully".to_owned(),
            Self::Synced { .. } => "User updated successfully".to_owned(),
            Self::Deleted { .. } => "User deleted successfully".to_owned(),
            Self::Ignored { event_type } => format!("Ignored event type: {event_type}"),
        }
    }
}

/// Application service receiving signed identity provider events.
#[derive(Clone)]
pub struct IdentityWebhookService {
    verifier: Arc<dyn WebhookVerifier>,
    sync_service: ProfileSyncService,
}

impl IdentityWebhookService {
    /// Creates a new webhook service.
    #[must_use]
    pub fn new(verifier: Arc<dyn WebhookVerifier>, sync_service: ProfileSyncService) -> Self {
        Self {
            verifier,
            sync_service,
        }
    }

    /// Verifies, parses and dispatches one delivery.
    pub async fn handle(
        &self,
        headers: WebhookHeaders,
        payload: &[u8],
    ) -> AppResult<WebhookOutcome> {
        let headers = headers.require()?;

        if let Err(error) = self.verifier.verify(payload, &headers) {
            warn!(message_id = %headers.id, %error, "rejected identity webhook");
            return Err(error);
        }

        let envelope = EventEnvelope::parse(payload)?;
        let Some(kind) = IdentityEventKind::from_event_type(&envelope.event_type) else {
            info!(
                message_id = %headers.id,
                event_type = %envelope.event_type,
                "ignoring identity webhook event"
            );
            return Ok(WebhookOutcome::Ignored {
                event_type: envelope.event_type,
            });
        };

        match kind {
            IdentityEventKind::UserCreated | IdentityEventKind::UserUpdated => {
                let request = UserEventData::from_data(envelope.data)?.into_sync_request()?;
                let external_id = request.external_id.clone();
                let synced = self
                    .sync_service
                    .sync(request, SyncTrust::SignedWebhook)
                    .await?;

                info!(
                    message_id = %headers.id,
                    event_type = kind.as_str(),
                    external_id = %external_id,
                    "processed identity webhook"
                );

                Ok(WebhookOutcome::Synced {
                    kind,
                    external_id,
                    outcome: synced.outcome,
                })
            }
            IdentityEventKind::UserDeleted => {
                let external_id = DeletedUserData::external_id(envelope.data)?;
                let removed = self.sync_service.remove(&external_id).await?;

                info!(
                    message_id = %headers.id,
                    event_type = kind.as_str(),
                    external_id = %external_id,
                    "processed identity webhook"
                );

                Ok(WebhookOutcome::Deleted {
                    external_id,
                    removed,
                })
            }
        }
    }
}
