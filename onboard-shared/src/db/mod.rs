/// Storage layer for Onboard
///
/// This module owns the SQLite connection pool and the embedded schema
/// migrations. The pool is created once at startup and handed explicitly to
/// every model operation; nothing in the crate holds a global handle.
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `migrations`: Embedded migration runner and status reporting
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use onboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use onboard_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig::default()).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;

pub use pool::DbPool;

/// Opens a migrated in-memory database for unit tests
#[cfg(test)]
pub(crate) async fn test_pool() -> DbPool {
    let pool = pool::create_pool(pool::DatabaseConfig::in_memory())
        .await
        .expect("in-memory pool should open");
    migrations::run_migrations(&pool)
        .await
        .expect("migrations should apply");
    pool
}
