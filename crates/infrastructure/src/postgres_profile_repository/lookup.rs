use super::*;

impl PostgresProfileRepository {
    pub(super) async fn find_by_external_id_impl(
        &self,
        external_id: &ExternalId,
    ) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, external_id, email, first_name, last_name, avatar_url,
                   role, email_verified, created_at, updated_at
            FROM profiles
            WHERE external_id = $1
            "#,
        )
        .bind(external_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error(StoreOperation::Lookup, external_id))?;

        row.map(Profile::try_from).transpose()
    }
}
