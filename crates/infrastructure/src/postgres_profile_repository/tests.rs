use coursely_application::{ProfileRepository, ProfileUpsert, UpsertOutcome};
use coursely_domain::{EmailAddress, ExternalId, ProfileContact, Role};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PostgresProfileRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres profile tests: {error}");
    }

    Some(pool)
}

fn unique_external_id() -> ExternalId {
    ExternalId::new(format!("user_{}", Uuid::new_v4().simple()))
        .unwrap_or_else(|error| panic!("invalid external id: {error}"))
}

fn upsert(external_id: &ExternalId, email: &str, first_name: Option<&str>) -> ProfileUpsert {
    let email = EmailAddress::new(email).unwrap_or_else(|error| panic!("invalid email: {error}"));
    ProfileUpsert {
        external_id: external_id.clone(),
        contact: ProfileContact::new(email, first_name.map(str::to_owned), None, None),
        initial_role: Role::Learner,
        initial_email_verified: true,
    }
}

#[tokio::test]
async fn upsert_reports_created_then_unchanged_then_updated() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresProfileRepository::new(pool);
    let external_id = unique_external_id();

    let created = repository
        .upsert(upsert(&external_id, "ada@example.com", Some("Ada")))
        .await
        .unwrap_or_else(|error| panic!("create failed: {error}"));
    let replayed = repository
        .upsert(upsert(&external_id, "ada@example.com", Some("Ada")))
        .await
        .unwrap_or_else(|error| panic!("replay failed: {error}"));
    let renamed = repository
        .upsert(upsert(&external_id, "ada@example.com", Some("Augusta")))
        .await
        .unwrap_or_else(|error| panic!("rename failed: {error}"));

    assert_eq!(created.outcome, UpsertOutcome::Created);
    assert_eq!(replayed.outcome, UpsertOutcome::Unchanged);
    assert_eq!(renamed.outcome, UpsertOutcome::Updated);
    assert_eq!(created.profile.id, renamed.profile.id);
    assert_eq!(renamed.profile.contact.first_name(), Some("Augusta"));
}

#[tokio::test]
async fn upsert_never_overwrites_role_or_verification() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresProfileRepository::new(pool);
    let external_id = unique_external_id();

    let _ = repository
        .upsert(upsert(&external_id, "grace@example.com", None))
        .await;
    let promoted = repository.update_role(&external_id, Role::Instructor).await;
    assert!(matches!(promoted, Ok(Some(profile)) if profile.role == Role::Instructor));

    let mut command = upsert(&external_id, "grace@navy.example.com", None);
    command.initial_role = Role::Learner;
    command.initial_email_verified = false;
    let synced = repository
        .upsert(command)
        .await
        .unwrap_or_else(|error| panic!("sync failed: {error}"));

    assert_eq!(synced.outcome, UpsertOutcome::Updated);
    assert_eq!(synced.profile.role, Role::Instructor);
    assert!(synced.profile.email_verified);
    assert_eq!(
        synced.profile.contact.email().as_str(),
        "grace@navy.example.com"
    );
}

#[tokio::test]
async fn concurrent_upserts_converge_on_one_row() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresProfileRepository::new(pool.clone());
    let external_id = unique_external_id();

    let (first, second) = tokio::join!(
        repository.upsert(upsert(&external_id, "race@example.com", Some("Webhook"))),
        repository.upsert(upsert(&external_id, "race@example.com", Some("Client"))),
    );
    assert!(first.is_ok());
    assert!(second.is_ok());

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE external_id = $1")
        .bind(external_id.as_str())
        .fetch_one(&pool)
        .await
        .unwrap_or_else(|error| panic!("count failed: {error}"));
    assert_eq!(count, 1);
}

#[tokio::test]
async fn delete_cascades_and_recreate_gets_default_role() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresProfileRepository::new(pool.clone());
    let external_id = unique_external_id();

    let created = repository
        .upsert(upsert(&external_id, "linus@example.com", None))
        .await
        .unwrap_or_else(|error| panic!("create failed: {error}"));
    let _ = repository.update_role(&external_id, Role::Admin).await;

    let course_id = Uuid::new_v4();
    let course_insert = sqlx::query(
        r#"
            INSERT INTO courses (id, instructor_id, title)
            VALUES ($1, $2, 'Kernel basics')
            "#,
    )
    .bind(course_id)
    .bind(created.profile.id.as_uuid())
    .execute(&pool)
    .await;
    assert!(course_insert.is_ok());

    assert!(matches!(repository.delete(&external_id).await, Ok(true)));
    assert!(matches!(repository.delete(&external_id).await, Ok(false)));

    let orphaned = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_one(&pool)
        .await
        .unwrap_or_else(|error| panic!("count failed: {error}"));
    assert_eq!(orphaned, 0);

    let recreated = repository
        .upsert(upsert(&external_id, "linus@example.com", None))
        .await
        .unwrap_or_else(|error| panic!("recreate failed: {error}"));
    assert_eq!(recreated.outcome, UpsertOutcome::Created);
    assert_eq!(recreated.profile.role, Role::Learner);
}

#[tokio::test]
async fn missing_profile_lookup_is_none() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresProfileRepository::new(pool);

    let found = repository
        .find_by_external_id(&unique_external_id())
        .await;
    assert!(matches!(found, Ok(None)));
    let updated = repository
        .update_role(&unique_external_id(), Role::Admin)
        .await;
    assert!(matches!(updated, Ok(None)));
}
