use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coursely_application::{SyncRequest, UpsertOutcome};
use coursely_core::{AppError, AppResult};
use coursely_domain::{EmailAddress, ExternalId, ProfileContact, SyncTrust};
use tracing::warn;

use crate::dto::{SyncUserRequest, SyncUserResponse};
use crate::error::ErrorResponse;
use crate::state::AppState;

/// Creates or refreshes the caller's profile from client-supplied fields.
///
/// The body is not signed, so new rows are never marked email-verified here.
pub async fn sync_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<SyncUserRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "rejected malformed sync request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid request body")),
            )
                .into_response();
        }
    };

    let sync_request = match sync_request_from(request) {
        Ok(sync_request) => sync_request,
        Err(error) => return error_response(error),
    };

    match state
        .sync_service
        .sync(sync_request, SyncTrust::UnverifiedClient)
        .await
    {
        Ok(upserted) => {
            let (status, message, action) = match upserted.outcome {
                UpsertOutcome::Created => (
                    StatusCode::CREATED,
                    "User profile created successfully",
                    "created",
                ),
                UpsertOutcome::Unchanged => {
                    (StatusCode::OK, "User profile already synced", "existing")
                }
                UpsertOutcome::Updated => (StatusCode::OK, "User profile updated", "updated"),
            };

            (
                status,
                Json(SyncUserResponse {
                    success: true,
                    message,
                    profile_id: upserted.profile.id.to_string(),
                    action,
                }),
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

fn sync_request_from(request: SyncUserRequest) -> AppResult<SyncRequest> {
    let clerk_id = request.clerk_id.unwrap_or_default();
    let email = request.email.unwrap_or_default();
    if clerk_id.trim().is_empty() || email.trim().is_empty() {
        return Err(AppError::Validation(
            "Missing required fields: clerkId and email".to_owned(),
        ));
    }

    Ok(SyncRequest {
        external_id: ExternalId::new(clerk_id)?,
        contact: ProfileContact::new(
            EmailAddress::new(email)?,
            request.first_name,
            request.last_name,
            request.image_url,
        ),
        email_verified_claim: None,
    })
}

fn error_response(error: AppError) -> Response {
    match error {
        AppError::Validation(message) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
        }
        failure @ AppError::Persistence { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::with_details(
                "Failed to sync user profile",
                failure.public_detail(),
            )),
        )
            .into_response(),
        failure => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::with_details(
                "Internal server error",
                failure.public_detail(),
            )),
        )
            .into_response(),
    }
}
