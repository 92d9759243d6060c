/// Integration tests for the models against a migrated in-memory database

use onboard_shared::db::migrations::run_migrations;
use onboard_shared::db::pool::{create_pool, DatabaseConfig};
use onboard_shared::db::DbPool;
use onboard_shared::models::checklist_progress::{merge_progress, ChecklistProgress};
use onboard_shared::models::onboarding_path::{OnboardingPath, DEFAULT_PATHS};
use onboard_shared::models::user::{CreateUser, PublicUser, UpdateProfile, User};

async fn setup() -> DbPool {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");
    run_migrations(&pool).await.expect("Failed to migrate");
    pool
}

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

#[tokio::test]
async fn test_seeding_twice_yields_five_paths() {
    let pool = setup().await;

    assert_eq!(OnboardingPath::seed_defaults(&pool).await.unwrap(), 5);
    assert_eq!(OnboardingPath::seed_defaults(&pool).await.unwrap(), 0);

    let paths = OnboardingPath::list_all(&pool).await.unwrap();
    assert_eq!(paths.len(), 5);

    for default in DEFAULT_PATHS.iter() {
        let path = OnboardingPath::find_by_user_type(&pool, default.user_type)
            .await
            .unwrap()
            .expect("seeded path should exist");
        assert_eq!(path.name, default.name);
        assert_eq!(path.parse_checklist().len(), default.checklist.len());
    }
}

#[tokio::test]
async fn test_concurrent_seeding_is_idempotent() {
    let pool = setup().await;

    let (a, b) = tokio::join!(
        OnboardingPath::seed_defaults(&pool),
        OnboardingPath::seed_defaults(&pool)
    );
    assert_eq!(a.unwrap() + b.unwrap(), 5);
    assert_eq!(OnboardingPath::list_all(&pool).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_email_uniqueness_is_case_insensitive() {
    let pool = setup().await;

    User::create(&pool, new_user("a@x.com")).await.unwrap();

    let err = User::create(&pool, new_user("A@X.COM"))
        .await
        .expect_err("duplicate email must be rejected");
    match err {
        sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(User::count(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_signups_store_one_user() {
    let pool = setup().await;

    let (a, b) = tokio::join!(
        User::create(&pool, new_user("race@x.com")),
        User::create(&pool, new_user("Race@x.com"))
    );
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert_eq!(User::count(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_profile_flow_with_listing() {
    let pool = setup().await;
    OnboardingPath::seed_defaults(&pool).await.unwrap();
    let founder = OnboardingPath::find_by_user_type(&pool, "Founder")
        .await
        .unwrap()
        .unwrap();

    let first = User::create(&pool, new_user("first@x.com")).await.unwrap();
    let second = User::create(&pool, new_user("second@x.com")).await.unwrap();

    // Empty update is a no-op
    assert!(User::update_profile(&pool, &first.id, UpdateProfile::default())
        .await
        .unwrap()
        .is_none());

    let updated = User::update_profile(
        &pool,
        &first.id,
        UpdateProfile {
            role: Some("Founder".to_string()),
            team_size: Some("6-20 people".to_string()),
            goal: Some("Grow revenue".to_string()),
            assigned_path: Some(founder.id.clone()),
        },
    )
    .await
    .unwrap()
    .expect("user exists");
    assert_eq!(updated.assigned_path.as_deref(), Some(founder.id.as_str()));

    let public = serde_json::to_value(PublicUser::from(updated)).unwrap();
    assert!(public.get("password_hash").is_none());

    let listing = User::list_all(&pool).await.unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].id, second.id);
    assert_eq!(listing[1].assigned_path_name.as_deref(), Some("Founder Onboarding"));
    assert!(listing[0].assigned_path_name.is_none());
}

#[tokio::test]
async fn test_checklist_progress_merges_with_path() {
    let pool = setup().await;
    OnboardingPath::seed_defaults(&pool).await.unwrap();
    let path = OnboardingPath::find_by_user_type(&pool, "Support Manager")
        .await
        .unwrap()
        .unwrap();
    let user = User::create(&pool, new_user("check@x.com")).await.unwrap();

    ChecklistProgress::set_completed(&pool, &user.id, &path.id, 0, true)
        .await
        .unwrap();

    let items = path.parse_checklist();
    let progress = ChecklistProgress::list_for_path(&pool, &user.id, &path.id)
        .await
        .unwrap();
    let entries = merge_progress(&items, &progress);

    assert_eq!(entries.len(), items.len());
    assert!(entries[0].completed);
    assert!(entries[1..].iter().all(|e| !e.completed));
}
