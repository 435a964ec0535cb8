//! Server-to-server endpoints behind the internal bearer token.
//!
//! The frontend server resolves the signed-in identity and forwards its
//! external id here; these handlers never see end-user credentials.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use coursely_core::{AppError, AppResult};
use coursely_domain::{Capability, ExternalId, Role};

use crate::dto::{AssignRoleRequest, CheckAccessRequest, CheckAccessResponse, ProfileResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_profile_handler(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let external_id = ExternalId::new(clerk_id)?;
    let profile = state.access_service.profile(&external_id).await?;

    Ok(Json(ProfileResponse::from(profile)))
}

pub async fn check_access_handler(
    State(state): State<AppState>,
    payload: Result<Json<CheckAccessRequest>, JsonRejection>,
) -> ApiResult<Json<CheckAccessResponse>> {
    let payload = json_body(payload)?;
    let external_id = ExternalId::new(payload.clerk_id)?;
    let capability = payload.capability.parse::<Capability>()?;

    let profile = state
        .access_service
        .require_capability(&external_id, capability)
        .await?;

    Ok(Json(CheckAccessResponse {
        allowed: true,
        role: profile.role.as_str().to_owned(),
    }))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    payload: Result<Json<AssignRoleRequest>, JsonRejection>,
) -> ApiResult<Json<ProfileResponse>> {
    let payload = json_body(payload)?;
    let target = ExternalId::new(clerk_id)?;
    let actor = ExternalId::new(payload.actor_clerk_id)?;
    let role = payload.role.parse::<Role>()?;

    let profile = state
        .access_service
        .assign_role(&actor, &target, role)
        .await?;

    Ok(Json(ProfileResponse::from(profile)))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        AppError::Validation(format!("invalid request body: {}", rejection.body_text()))
    })
}
