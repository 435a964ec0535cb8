use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coursely_core::AppError;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

pub fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation(_) | AppError::MissingHeaders(_) | AppError::InvalidSignature(_) => {
            StatusCode::BAD_REQUEST
        }
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::Persistence { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        let payload = if status.is_server_error() {
            error!(error = %self.0, "request failed");
            ErrorResponse::with_details("Internal server error", self.0.public_detail())
        } else {
            ErrorResponse::new(self.0.public_detail())
        };

        (status, Json(payload)).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use coursely_core::{AppError, StoreOperation};

    use super::ApiError;

    #[test]
    fn signature_failures_are_bad_requests() {
        let response =
            ApiError::from(AppError::InvalidSignature("no match".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn persistence_failures_are_server_errors() {
        let response = ApiError::from(AppError::persistence(
            StoreOperation::Upsert,
            "user_1",
            "connection reset",
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let response = ApiError::from(AppError::Forbidden("nope".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
