use axum::Router;
use axum::routing::{get, post};
use coursely_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;
mod internal;

use cors::build_cors_layer;
use internal::build_internal_routes;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let internal_routes = build_internal_routes(app_state.clone());

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/webhooks/clerk",
            post(handlers::webhooks::clerk_webhook_handler),
        )
        .route("/api/users/sync", post(handlers::users::sync_user_handler))
        .merge(internal_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}

#[cfg(test)]
mod tests;
