use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_internal_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/internal/profiles/{clerk_id}",
            get(handlers::internal::get_profile_handler),
        )
        .route(
            "/api/internal/profiles/{clerk_id}/role",
            put(handlers::internal::assign_role_handler),
        )
        .route(
            "/api/internal/access/check",
            post(handlers::internal::check_access_handler),
        )
        .route_layer(from_fn_with_state(
            app_state,
            middleware::require_internal_token,
        ))
}
