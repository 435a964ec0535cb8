//! PostgreSQL-backed profile repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use coursely_application::{ProfileRepository, ProfileUpsert, UpsertOutcome, UpsertedProfile};
use coursely_core::{AppError, AppResult, StoreOperation};
use coursely_domain::{EmailAddress, ExternalId, Profile, ProfileContact, ProfileId, Role};

/// PostgreSQL implementation of the profile repository port.
#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    external_id: String,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    avatar_url: Option<String>,
    role: String,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    profile: ProfileRow,
    outcome: String,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let corrupt = |error: AppError| {
            AppError::Internal(format!(
                "stored profile '{}' is invalid: {error}",
                row.external_id
            ))
        };

        let role = row.role.parse::<Role>().map_err(corrupt)?;
        let email = EmailAddress::new(row.email.as_str()).map_err(corrupt)?;
        let external_id = ExternalId::new(row.external_id.as_str()).map_err(corrupt)?;

        Ok(Self {
            id: ProfileId::from_uuid(row.id),
            external_id,
            contact: ProfileContact::new(email, row.first_name, row.last_name, row.avatar_url),
            role,
            email_verified: row.email_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_outcome(value: &str) -> AppResult<UpsertOutcome> {
    match value {
        "created" => Ok(UpsertOutcome::Created),
        "updated" => Ok(UpsertOutcome::Updated),
        "unchanged" => Ok(UpsertOutcome::Unchanged),
        other => Err(AppError::Internal(format!(
            "unexpected upsert outcome '{other}'"
        ))),
    }
}

fn store_error(
    operation: StoreOperation,
    external_id: &ExternalId,
) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |error| AppError::persistence(operation, external_id.as_str(), error.to_string())
}

mod lookup;
mod write;

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_external_id(&self, external_id: &ExternalId) -> AppResult<Option<Profile>> {
        self.find_by_external_id_impl(external_id).await
    }

    async fn upsert(&self, command: ProfileUpsert) -> AppResult<UpsertedProfile> {
        self.upsert_impl(command).await
    }

    async fn delete(&self, external_id: &ExternalId) -> AppResult<bool> {
        self.delete_impl(external_id).await
    }

    async fn update_role(
        &self,
        external_id: &ExternalId,
        role: Role,
    ) -> AppResult<Option<Profile>> {
        self.update_role_impl(external_id, role).await
    }
}

#[cfg(test)]
mod tests;
