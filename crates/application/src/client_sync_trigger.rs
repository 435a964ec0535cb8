//! Best-effort profile sync fired once after client-side sign-in.
//!
//! The webhook remains the source of truth; this only shortens the window in
//! which a freshly signed-in user has no profile row yet.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use coursely_core::AppResult;

/// Body of `POST /api/users/sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSyncPayload {
    /// Identity provider user id.
    pub clerk_id: String,
    /// Email address shown to the signed-in user.
    pub email: String,
    /// First name, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Avatar URL, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Transition reported by the sync endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientSyncAction {
    /// A new profile was inserted.
    Created,
    /// The profile existed with identical contact fields.
    Existing,
    /// The profile existed and its contact fields changed.
    Updated,
}

/// Successful response of the sync endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSyncReceipt {
    /// Always `true` on success.
    pub success: bool,
    /// Human-readable status.
    pub message: String,
    /// Internal profile id.
    pub profile_id: String,
    /// Applied transition.
    pub action: ClientSyncAction,
}

/// Port for calling the sync endpoint.
#[async_trait]
pub trait SyncApiClient: Send + Sync {
    /// Posts identity attributes to the sync endpoint.
    async fn sync_profile(&self, payload: &ClientSyncPayload) -> AppResult<ClientSyncReceipt>;
}

/// Signed-in identity as seen by the client session.
#[derive(Debug, Clone, Default)]
pub struct ClientIdentity {
    /// Identity provider user id.
    pub external_id: String,
    /// Email addresses in the order the session lists them.
    pub email_addresses: Vec<String>,
    /// First name, if set.
    pub first_name: Option<String>,
    /// Last name, if set.
    pub last_name: Option<String>,
    /// Avatar URL, if set.
    pub image_url: Option<String>,
}

impl ClientIdentity {
    fn to_payload(&self) -> ClientSyncPayload {
        ClientSyncPayload {
            clerk_id: self.external_id.clone(),
            email: self.email_addresses.first().cloned().unwrap_or_default(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// What a trigger invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Session not loaded yet or nobody signed in; the latch stays open.
    NotReady,
    /// The latch already fired for this trigger instance.
    AlreadyFired,
    /// The endpoint accepted the sync.
    Synced(ClientSyncReceipt),
    /// The call failed; the failure was logged and swallowed.
    Failed,
}

/// One-shot sync trigger bound to a single mount of the signed-in shell.
///
/// The latch is keyed on the instance, not on the identity: a different user
/// signing in on the same instance does not fire a second sync.
pub struct ClientSyncTrigger {
    client: Arc<dyn SyncApiClient>,
    fired: AtomicBool,
}

impl ClientSyncTrigger {
    /// Creates an armed trigger.
    #[must_use]
    pub fn new(client: Arc<dyn SyncApiClient>) -> Self {
        Self {
            client,
            fired: AtomicBool::new(false),
        }
    }

    /// Returns whether the latch has fired.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Reacts to a session state change.
    ///
    /// Never returns an error: failures are logged and the caller proceeds
    /// with a possibly unsynced profile.
    pub async fn on_session_change(
        &self,
        is_loaded: bool,
        identity: Option<&ClientIdentity>,
    ) -> TriggerOutcome {
        let Some(identity) = identity.filter(|_| is_loaded) else {
            return TriggerOutcome::NotReady;
        };

        if self.fired.swap(true, Ordering::SeqCst) {
            return TriggerOutcome::AlreadyFired;
        }

        match self.client.sync_profile(&identity.to_payload()).await {
            Ok(receipt) => {
                info!(
                    external_id = %identity.external_id,
                    profile_id = %receipt.profile_id,
                    action = ?receipt.action,
                    "client profile sync succeeded"
                );
                TriggerOutcome::Synced(receipt)
            }
            Err(error) => {
                warn!(
                    external_id = %identity.external_id,
                    %error,
                    "client profile sync failed"
                );
                TriggerOutcome::Failed
            }
        }
    }

    /// Runs [`Self::on_session_change`] in the background so the caller is
    /// never blocked on the network round-trip.
    pub fn spawn_on_session_change(
        self: &Arc<Self>,
        is_loaded: bool,
        identity: Option<ClientIdentity>,
    ) -> JoinHandle<TriggerOutcome> {
        let trigger = Arc::clone(self);
        tokio::spawn(async move {
            trigger
                .on_session_change(is_loaded, identity.as_ref())
                .await
        })
    }
}
