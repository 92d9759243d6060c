/// Database models for Onboard
///
/// This module contains all database models and their operations. Every
/// operation takes the pool explicitly; rows are typed records, and the types
/// that reach HTTP clients are separate projections.
///
/// # Models
///
/// - `user`: User accounts, profile answers and assigned path
/// - `onboarding_path`: The path catalog and its default seed data
/// - `checklist_progress`: Per-user completion state of checklist items
///
/// # Example
///
/// ```no_run
/// use onboard_shared::models::user::{User, CreateUser};
/// use onboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "user@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod checklist_progress;
pub mod onboarding_path;
pub mod user;

/// Generates a new opaque record identifier
///
/// 16 random bytes rendered as 32 lowercase hex characters. Identifiers are
/// not sequential, so they cannot be enumerated.
pub fn generate_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}
