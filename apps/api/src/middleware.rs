use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use coursely_core::AppError;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::ApiResult;
use crate::state::AppState;

/// Admits only callers presenting the shared internal bearer token.
pub async fn require_internal_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();

    if !token_matches(presented, &state.internal_api_token) {
        warn!(path = %request.uri().path(), "rejected internal request");
        return Err(AppError::Unauthorized("invalid internal api token".to_owned()).into());
    }

    Ok(next.run(request).await)
}

fn token_matches(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
