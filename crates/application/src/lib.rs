//! Application services and ports.

#![forbid(unsafe_code)]

mod access_service;
mod client_sync_trigger;
mod identity_webhook_service;
mod profile_ports;
mod profile_sync_service;
#[cfg(test)]
mod test_support;
mod webhook_ports;

pub use access_service::AccessService;
pub use client_sync_trigger::{
    ClientIdentity, ClientSyncAction, ClientSyncPayload, ClientSyncReceipt, ClientSyncTrigger,
    SyncApiClient, TriggerOutcome,
};
pub use identity_webhook_service::{IdentityEventKind, IdentityWebhookService, WebhookOutcome};
pub use profile_ports::{ProfileRepository, ProfileUpsert, UpsertOutcome, UpsertedProfile};
pub use profile_sync_service::{ProfileSyncService, SyncRequest};
pub use webhook_ports::{SignedHeaders, WebhookHeaders, WebhookVerifier};
