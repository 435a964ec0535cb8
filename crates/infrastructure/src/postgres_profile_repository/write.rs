use super::*;

impl PostgresProfileRepository {
    /// Single-statement upsert keyed on the unique `external_id` constraint.
    ///
    /// `updated_at` only moves when a contact field changed, which lets the
    /// returned row tell `updated` apart from `unchanged`. `xmax = 0` holds
    /// only for a freshly inserted tuple.
    pub(super) async fn upsert_impl(&self, command: ProfileUpsert) -> AppResult<UpsertedProfile> {
        let contact = &command.contact;
        let row = sqlx::query_as::<_, UpsertRow>(
            r#"
            INSERT INTO profiles (
                id, external_id, email, first_name, last_name, avatar_url,
                role, email_verified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (external_id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = CASE
                    WHEN (profiles.email, profiles.first_name, profiles.last_name, profiles.avatar_url)
                        IS DISTINCT FROM
                        (EXCLUDED.email, EXCLUDED.first_name, EXCLUDED.last_name, EXCLUDED.avatar_url)
                    THEN now()
                    ELSE profiles.updated_at
                END
            RETURNING
                id, external_id, email, first_name, last_name, avatar_url,
                role, email_verified, created_at, updated_at,
                CASE
                    WHEN xmax = 0 THEN 'created'
                    WHEN updated_at = now() THEN 'updated'
                    ELSE 'unchanged'
                END AS outcome
            "#,
        )
        .bind(ProfileId::new().as_uuid())
        .bind(command.external_id.as_str())
        .bind(contact.email().as_str())
        .bind(contact.first_name())
        .bind(contact.last_name())
        .bind(contact.avatar_url())
        .bind(command.initial_role.as_str())
        .bind(command.initial_email_verified)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error(StoreOperation::Upsert, &command.external_id))?;

        let outcome = parse_outcome(row.outcome.as_str())?;
        Ok(UpsertedProfile {
            profile: Profile::try_from(row.profile)?,
            outcome,
        })
    }

    pub(super) async fn delete_impl(&self, external_id: &ExternalId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM profiles
            WHERE external_id = $1
            "#,
        )
        .bind(external_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(store_error(StoreOperation::Delete, external_id))?;

        Ok(result.rows_affected() > 0)
    }

    pub(super) async fn update_role_impl(
        &self,
        external_id: &ExternalId,
        role: Role,
    ) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles
            SET role = $2,
                updated_at = now()
            WHERE external_id = $1
            RETURNING id, external_id, email, first_name, last_name, avatar_url,
                      role, email_verified, created_at, updated_at
            "#,
        )
        .bind(external_id.as_str())
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error(StoreOperation::UpdateRole, external_id))?;

        row.map(Profile::try_from).transpose()
    }
}
