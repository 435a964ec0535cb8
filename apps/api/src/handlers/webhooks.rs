use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use coursely_application::WebhookHeaders;
use coursely_core::AppError;
use tracing::error;

use crate::state::AppState;

const SVIX_ID: &str = "svix-id";
const SVIX_TIMESTAMP: &str = "svix-timestamp";
const SVIX_SIGNATURE: &str = "svix-signature";

/// Receives identity provider lifecycle events.
///
/// Answers in plain text: the provider only looks at the status code and
/// redelivers on anything but 2xx.
pub async fn clerk_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let webhook_headers = WebhookHeaders {
        id: header_value(&headers, SVIX_ID),
        timestamp: header_value(&headers, SVIX_TIMESTAMP),
        signature: header_value(&headers, SVIX_SIGNATURE),
    };

    match state.webhook_service.handle(webhook_headers, &body).await {
        Ok(outcome) => (StatusCode::OK, outcome.message()),
        Err(AppError::MissingHeaders(_)) => (
            StatusCode::BAD_REQUEST,
            "Error: Missing Svix headers".to_owned(),
        ),
        Err(AppError::InvalidSignature(_)) => (
            StatusCode::BAD_REQUEST,
            "Error: Could not verify webhook".to_owned(),
        ),
        Err(AppError::Validation(detail)) => (
            StatusCode::BAD_REQUEST,
            format!("Error: Invalid webhook payload: {detail}"),
        ),
        Err(failure) => {
            error!(error = %failure, "identity webhook processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_owned(),
            )
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}
