/// Integration tests for the SQLite connection pool
///
/// Each test opens its own database file under the system temp directory and
/// removes it afterwards.

use onboard_shared::db::migrations::{get_migration_status, run_migrations};
use onboard_shared::db::pool::{close_pool, create_pool, get_pool_stats, health_check, DatabaseConfig};
use std::path::PathBuf;

/// Fresh database path in a private temp directory
fn temp_db_path() -> (PathBuf, PathBuf) {
    let dir = std::env::temp_dir().join(format!(
        "onboard-it-{}",
        hex::encode(rand::random::<[u8; 8]>())
    ));
    let path = dir.join("onboard.db");
    (dir, path)
}

fn file_config(path: &PathBuf, max_connections: u32) -> DatabaseConfig {
    DatabaseConfig {
        path: path.to_string_lossy().into_owned(),
        max_connections,
        min_connections: 1,
        connect_timeout_seconds: 5,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_pool_and_health_check() {
    let (dir, path) = temp_db_path();

    let pool = create_pool(file_config(&path, 5))
        .await
        .expect("Failed to create pool");

    assert!(health_check(&pool).await.is_ok(), "Health check should succeed");

    let stats = get_pool_stats(&pool);
    assert!(stats.total_connections > 0, "Pool should have at least one connection");

    close_pool(pool).await;
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_pool_concurrent_queries() {
    let (dir, path) = temp_db_path();
    let pool = create_pool(file_config(&path, 4))
        .await
        .expect("Failed to create pool");

    // More tasks than connections to exercise queueing
    let mut handles = vec![];
    for i in 0..20i64 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let row: (i64,) = sqlx::query_as("SELECT ?")
                .bind(i)
                .fetch_one(&pool)
                .await
                .expect("Failed to execute query");
            assert_eq!(row.0, i);
        }));
    }

    for handle in handles {
        handle.await.expect("Task panicked");
    }

    close_pool(pool).await;
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let (dir, path) = temp_db_path();

    let pool = create_pool(file_config(&path, 2)).await.unwrap();
    run_migrations(&pool).await.unwrap();
    sqlx::query(
        "INSERT INTO onboarding_paths (id, user_type, name, description, checklist_items, created_at)
         VALUES ('p1', 'Founder', 'Founder Onboarding', '', '[]', '2025-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();
    close_pool(pool).await;

    let pool = create_pool(file_config(&path, 2)).await.unwrap();
    let status = get_migration_status(&pool).await.unwrap();
    assert!(status.is_up_to_date);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM onboarding_paths")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    close_pool(pool).await;
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_foreign_keys_enforced() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let result = sqlx::query(
        "INSERT INTO users (id, email, password_hash, assigned_path, created_at, updated_at)
         VALUES ('u1', 'a@x.com', 'h', 'missing-path', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "Dangling assigned_path should be rejected");
}
