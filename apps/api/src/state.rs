use std::sync::Arc;

use coursely_application::{
    AccessService, IdentityWebhookService, ProfileRepository, ProfileSyncService, WebhookVerifier,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub webhook_service: IdentityWebhookService,
    pub sync_service: ProfileSyncService,
    pub access_service: AccessService,
    pub postgres_pool: PgPool,
    pub internal_api_token: Arc<str>,
}

impl AppState {
    /// Wires the application services around one profile store.
    pub fn new(
        profile_repository: Arc<dyn ProfileRepository>,
        verifier: Arc<dyn WebhookVerifier>,
        postgres_pool: PgPool,
        internal_api_token: String,
    ) -> Self {
        let sync_service = ProfileSyncService::new(profile_repository.clone());

        Self {
            webhook_service: IdentityWebhookService::new(verifier, sync_service.clone()),
            sync_service,
            access_service: AccessService::new(profile_repository),
            postgres_pool,
            internal_api_token: Arc::from(internal_api_token),
        }
    }
}
