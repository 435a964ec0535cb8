//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_sync_api_client;
mod in_memory_profile_repository;
mod postgres_profile_repository;
mod svix_webhook_verifier;

pub use http_sync_api_client::HttpSyncApiClient;
pub use in_memory_profile_repository::InMemoryProfileRepository;
pub use postgres_profile_repository::PostgresProfileRepository;
pub use svix_webhook_verifier::{DEFAULT_TOLERANCE_SECONDS, SvixWebhookVerifier};
