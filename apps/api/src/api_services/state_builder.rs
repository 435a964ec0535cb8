use std::sync::Arc;

use coursely_application::{ProfileRepository, WebhookVerifier};
use coursely_core::AppError;
use coursely_infrastructure::{PostgresProfileRepository, SvixWebhookVerifier};
use sqlx::PgPool;
use tracing::warn;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let profile_repository: Arc<dyn ProfileRepository> =
        Arc::new(PostgresProfileRepository::new(pool.clone()));
    let verifier = build_webhook_verifier(config)?;

    Ok(AppState::new(
        profile_repository,
        verifier,
        pool,
        config.internal_api_token.clone(),
    ))
}

fn build_webhook_verifier(config: &ApiConfig) -> Result<Arc<dyn WebhookVerifier>, AppError> {
    match config.clerk_webhook_secret.as_deref() {
        Some(secret) => Ok(Arc::new(SvixWebhookVerifier::new(
            secret,
            config.webhook_tolerance_seconds,
        )?)),
        None => {
            warn!("CLERK_WEBHOOK_SECRET is not set; every identity webhook will be rejected");
            Ok(Arc::new(SvixWebhookVerifier::disabled()))
        }
    }
}
