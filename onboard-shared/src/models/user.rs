/// User model and database operations
///
/// This module provides the User model and the credential store operations:
/// account creation, lookup, profile updates and the admin listing.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id TEXT PRIMARY KEY NOT NULL,
///     email TEXT NOT NULL UNIQUE COLLATE NOCASE,
///     password_hash TEXT NOT NULL,
///     role TEXT,
///     team_size TEXT,
///     goal TEXT,
///     assigned_path TEXT REFERENCES onboarding_paths(id),
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Redaction
///
/// [`User`] carries the password hash and is deliberately not `Serialize`.
/// Anything returned to a client goes through [`PublicUser`] (via `From<User>`)
/// or [`UserListing`], neither of which has a hash field.
///
/// # Example
///
/// ```no_run
/// use onboard_shared::models::user::{User, CreateUser, PublicUser};
/// use onboard_shared::db::DbPool;
///
/// # async fn example(pool: DbPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "User@Example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// assert_eq!(user.email, "user@example.com");
/// let public: PublicUser = user.into();
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::generate_id;
use crate::db::DbPool;

/// User row as stored, including the password hash
///
/// Never serialize this type; convert it into [`PublicUser`] first.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Opaque 32-char hex identifier
    pub id: String,

    /// Email address, lowercased and trimmed
    pub email: String,

    /// Argon2id password hash (PHC string)
    pub password_hash: String,

    /// Self-described role from the onboarding form
    pub role: Option<String>,

    /// Team size bucket from the onboarding form
    pub team_size: Option<String>,

    /// Primary goal from the onboarding form
    pub goal: Option<String>,

    /// ID of the assigned onboarding path
    pub assigned_path: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Client-safe view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub role: Option<String>,
    pub team_size: Option<String>,
    pub goal: Option<String>,
    pub assigned_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            team_size: user.team_size,
            goal: user.goal,
            assigned_path: user.assigned_path,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Row of the admin user listing
///
/// Selected without the password hash column and enriched with the name of
/// the assigned path (`"Unknown"` if the path no longer resolves).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserListing {
    pub id: String,
    pub email: String,
    pub role: Option<String>,
    pub team_size: Option<String>,
    pub goal: Option<String>,
    pub assigned_path: Option<String>,
    pub created_at: DateTime<Utc>,

    #[serde(rename = "assignedPathName")]
    pub assigned_path_name: Option<String>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address (normalized before storage)
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

/// Partial profile update
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub role: Option<String>,
    pub team_size: Option<String>,
    pub goal: Option<String>,
    pub assigned_path: Option<String>,
}

impl UpdateProfile {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.team_size.is_none()
            && self.goal.is_none()
            && self.assigned_path.is_none()
    }
}

/// Normalizes an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    /// Creates a new user with a fresh random identifier
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::Database` with a unique violation if the email is
    /// already registered. Callers may check [`User::find_by_email`] first,
    /// but the constraint is what guarantees uniqueness under concurrency.
    pub async fn create(pool: &DbPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, email, password_hash, role, team_size, goal, assigned_path,
                      created_at, updated_at
            "#,
        )
        .bind(generate_id())
        .bind(normalize_email(&data.email))
        .bind(data.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, team_size, goal, assigned_path,
                   created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (normalized before lookup)
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, team_size, goal, assigned_path,
                   created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Applies a partial profile update
    ///
    /// Returns `Ok(None)` without touching the database when `data` has no
    /// fields, and `Ok(None)` when no user has the given ID. Otherwise
    /// `updated_at` is bumped and the refreshed row is returned.
    pub async fn update_profile(
        pool: &DbPool,
        id: &str,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Ok(None);
        }

        // Placeholders are positional, so bind order must follow push order
        let mut query = String::from("UPDATE users SET updated_at = ?");

        if data.role.is_some() {
            query.push_str(", role = ?");
        }
        if data.team_size.is_some() {
            query.push_str(", team_size = ?");
        }
        if data.goal.is_some() {
            query.push_str(", goal = ?");
        }
        if data.assigned_path.is_some() {
            query.push_str(", assigned_path = ?");
        }

        query.push_str(
            " WHERE id = ? RETURNING id, email, password_hash, role, team_size, goal, assigned_path, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(Utc::now());

        if let Some(role) = data.role {
            q = q.bind(role);
        }
        if let Some(team_size) = data.team_size {
            q = q.bind(team_size);
        }
        if let Some(goal) = data.goal {
            q = q.bind(goal);
        }
        if let Some(assigned_path) = data.assigned_path {
            q = q.bind(assigned_path);
        }

        let user = q.bind(id).fetch_optional(pool).await?;

        Ok(user)
    }

    /// Lists all users for the admin view, newest first
    pub async fn list_all(pool: &DbPool) -> Result<Vec<UserListing>, sqlx::Error> {
        let users = sqlx::query_as::<_, UserListing>(
            r#"
            SELECT u.id, u.email, u.role, u.team_size, u.goal, u.assigned_path, u.created_at,
                   CASE
                       WHEN u.assigned_path IS NULL THEN NULL
                       ELSE COALESCE(p.name, 'Unknown')
                   END AS assigned_path_name
            FROM users u
            LEFT JOIN onboarding_paths p ON p.id = u.assigned_path
            ORDER BY u.created_at DESC, u.rowid DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts total number of users
    pub async fn count(pool: &DbPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Local part of the email, used as a display name
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}
