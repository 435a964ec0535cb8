use coursely_domain::Profile;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// One runtime dependency health status.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

/// Identity attributes posted by the signed-in client.
///
/// Every field is optional on the wire so that missing and blank values both
/// surface as the same validation error.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/sync-user-request.ts"
)]
pub struct SyncUserRequest {
    pub clerk_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

/// Successful sync result.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/sync-user-response.ts"
)]
pub struct SyncUserResponse {
    pub success: bool,
    pub message: &'static str,
    pub profile_id: String,
    pub action: &'static str,
}

/// API representation of a profile with its derived capabilities.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/profile-response.ts"
)]
pub struct ProfileResponse {
    pub profile_id: String,
    pub clerk_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub role: String,
    pub email_verified: bool,
    pub capabilities: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            profile_id: profile.id.to_string(),
            clerk_id: profile.external_id.as_str().to_owned(),
            email: profile.contact.email().as_str().to_owned(),
            first_name: profile.contact.first_name().map(ToOwned::to_owned),
            last_name: profile.contact.last_name().map(ToOwned::to_owned),
            image_url: profile.contact.avatar_url().map(ToOwned::to_owned),
            role: profile.role.as_str().to_owned(),
            email_verified: profile.email_verified,
            capabilities: profile
                .role
                .capabilities()
                .into_iter()
                .map(|capability| capability.as_str().to_owned())
                .collect(),
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for a capability check.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/check-access-request.ts"
)]
pub struct CheckAccessRequest {
    pub clerk_id: String,
    pub capability: String,
}

/// Capability check result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/check-access-response.ts"
)]
pub struct CheckAccessResponse {
    pub allowed: bool,
    pub role: String,
}

/// Incoming payload for a role change.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub actor_clerk_id: String,
    pub role: String,
}
