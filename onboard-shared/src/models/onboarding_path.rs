/// Onboarding path catalog
///
/// An onboarding path is a role-specific checklist template. Paths are keyed by
/// their `user_type` label ("Founder", "Sales Lead", ...), at most one path per
/// label. The catalog is seeded once at startup and is read-only afterwards.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE onboarding_paths (
///     id TEXT PRIMARY KEY NOT NULL,
///     user_type TEXT NOT NULL UNIQUE,
///     name TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     checklist_items TEXT NOT NULL DEFAULT '[]',  -- JSON array
///     created_at TEXT NOT NULL
/// );
/// ```
///
/// Checklist items are stored as an ordered JSON blob rather than rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use tracing::{debug, info, warn};

use super::generate_id;
use crate::db::DbPool;

/// One step of a path's checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub title: String,
    pub description: String,
}

/// Onboarding path row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OnboardingPath {
    /// Opaque 32-char hex identifier
    pub id: String,

    /// Path label, the natural key
    pub user_type: String,

    /// Display name
    pub name: String,

    pub description: String,

    /// Serialized checklist, see [`OnboardingPath::parse_checklist`]
    pub checklist_items: String,

    pub created_at: DateTime<Utc>,
}

/// Path as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathDetails {
    pub id: String,
    pub name: String,
    pub description: String,
    pub checklist: Vec<ChecklistItem>,
}

/// Input for creating a path
#[derive(Debug, Clone)]
pub struct CreatePath {
    pub user_type: String,
    pub name: String,
    pub description: String,
    pub checklist: Vec<ChecklistItem>,
}

/// Built-in path definition used for seeding
#[derive(Debug, Clone, Copy)]
pub struct DefaultPath {
    pub user_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub checklist: &'static [(&'static str, &'static str)],
}

impl DefaultPath {
    fn to_create(self) -> CreatePath {
        CreatePath {
            user_type: self.user_type.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            checklist: self
                .checklist
                .iter()
                .map(|(title, description)| ChecklistItem {
                    title: title.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        }
    }
}

/// The built-in catalog, in classification order
///
/// The first entry doubles as the default label when classification finds no
/// better match.
pub const DEFAULT_PATHS: [DefaultPath; 5] = [
    DefaultPath {
        user_type: "Operations Manager",
        name: "Operations Manager Onboarding",
        description: "Streamline workflows, automate processes, and manage team efficiency",
        checklist: &[
            ("Set up team members", "Invite and manage your team"),
            ("Create approval workflows", "Define custom workflows for your process"),
            ("Configure automated reports", "Set up weekly/monthly reports"),
            ("Integrate with your tools", "Connect Slack, Jira, or other tools"),
        ],
    },
    DefaultPath {
        user_type: "Sales Lead",
        name: "Sales Lead Onboarding",
        description: "Boost productivity, manage pipeline, and track team performance",
        checklist: &[
            ("Import your contacts", "Build your initial contact database"),
            ("Create sales stages", "Customize your pipeline stages"),
            ("Set team goals", "Define quarterly targets"),
            ("Enable forecasting", "Track pipeline health and predictions"),
        ],
    },
    DefaultPath {
        user_type: "Founder",
        name: "Founder Onboarding",
        description: "Get complete control with advanced analytics and team management",
        checklist: &[
            ("Complete company profile", "Set org name, industry, and details"),
            ("Create teams and roles", "Organize users by department"),
            ("Set up integrations", "Connect all your existing tools"),
            ("Configure permissions", "Manage who can do what"),
            ("Enable analytics dashboard", "Track all key metrics in one place"),
        ],
    },
    DefaultPath {
        user_type: "Support Manager",
        name: "Support Manager Onboarding",
        description: "Deliver better support, faster response, and higher satisfaction",
        checklist: &[
            ("Set up help desk", "Configure support channels"),
            ("Create ticket templates", "Standardize issue handling"),
            ("Configure SLAs", "Set response and resolution times"),
            ("Create knowledge base", "Build self-service articles"),
        ],
    },
    DefaultPath {
        user_type: "Marketing Manager",
        name: "Marketing Manager Onboarding",
        description: "Plan campaigns, track results, and optimize marketing spend",
        checklist: &[
            ("Create marketing calendar", "Plan campaigns and content"),
            ("Set up email templates", "Design automated email flows"),
            ("Create assets library", "Organize brand assets"),
            ("Connect analytics", "Track campaign performance"),
        ],
    },
];

/// Labels of the built-in catalog, in catalog order
pub fn default_labels() -> Vec<&'static str> {
    DEFAULT_PATHS.iter().map(|p| p.user_type).collect()
}

impl OnboardingPath {
    /// Seeds the built-in catalog
    ///
    /// Creates each default path only if no path with its label exists yet, so
    /// it is safe to call on every start. A unique violation from a concurrent
    /// seeder counts as "already present".
    ///
    /// # Returns
    ///
    /// Number of paths actually inserted
    pub async fn seed_defaults(pool: &DbPool) -> Result<usize, sqlx::Error> {
        let mut inserted = 0;

        for seed in DEFAULT_PATHS {
            if Self::find_by_user_type(pool, seed.user_type).await?.is_some() {
                debug!(user_type = seed.user_type, "Path already seeded");
                continue;
            }

            match Self::create(pool, seed.to_create()).await {
                Ok(path) => {
                    info!(user_type = %path.user_type, id = %path.id, "Seeded onboarding path");
                    inserted += 1;
                }
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    debug!(user_type = seed.user_type, "Path seeded concurrently");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(inserted)
    }

    /// Creates a new path
    ///
    /// # Errors
    ///
    /// Returns a unique violation if a path with the same label exists.
    pub async fn create(pool: &DbPool, data: CreatePath) -> Result<Self, sqlx::Error> {
        let path = sqlx::query_as::<_, OnboardingPath>(
            r#"
            INSERT INTO onboarding_paths (id, user_type, name, description, checklist_items, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, user_type, name, description, checklist_items, created_at
            "#,
        )
        .bind(generate_id())
        .bind(data.user_type)
        .bind(data.name)
        .bind(data.description)
        .bind(Json(data.checklist))
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(path)
    }

    /// Finds a path by ID
    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, OnboardingPath>(
            r#"
            SELECT id, user_type, name, description, checklist_items, created_at
            FROM onboarding_paths
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a path by its label
    pub async fn find_by_user_type(
        pool: &DbPool,
        user_type: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, OnboardingPath>(
            r#"
            SELECT id, user_type, name, description, checklist_items, created_at
            FROM onboarding_paths
            WHERE user_type = ?
            "#,
        )
        .bind(user_type)
        .fetch_optional(pool)
        .await
    }

    /// Lists all paths ordered by label
    pub async fn list_all(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, OnboardingPath>(
            r#"
            SELECT id, user_type, name, description, checklist_items, created_at
            FROM onboarding_paths
            ORDER BY user_type
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Decodes the stored checklist
    ///
    /// A malformed blob yields an empty checklist instead of an error.
    pub fn parse_checklist(&self) -> Vec<ChecklistItem> {
        serde_json::from_str(&self.checklist_items).unwrap_or_else(|e| {
            warn!(path_id = %self.id, error = %e, "Malformed checklist, treating as empty");
            Vec::new()
        })
    }

    /// Client-facing projection with the decoded checklist
    pub fn details(&self) -> PathDetails {
        PathDetails {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            checklist: self.parse_checklist(),
        }
    }
}
